use std::{collections::VecDeque, io::BufRead};

use crate::errors::errors::ErrorImpl;

/// Where `read` takes its values from.
pub enum Input {
    /// A finite, ordered list of values; used for deterministic runs.
    Queue(VecDeque<String>),
    /// A live line-oriented stream. Blocks until a line arrives.
    Interactive(Box<dyn BufRead>),
}

impl Input {
    pub fn next_value(&mut self) -> Result<String, ErrorImpl> {
        match self {
            Input::Queue(queue) => queue.pop_front().ok_or(ErrorImpl::InputExhausted),
            Input::Interactive(reader) => {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => Err(ErrorImpl::InputExhausted),
                    Ok(_) => Ok(line.trim_end_matches(['\n', '\r']).to_string()),
                    Err(error) => {
                        tracing::warn!(error = %error, "failed to read input");
                        Err(ErrorImpl::InputExhausted)
                    }
                }
            }
        }
    }
}
