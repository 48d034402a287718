/// Options for one VM run.
#[derive(Debug, Clone, Default)]
pub struct VmConfig {
    /// Emit a trace event per executed instruction and per printed line.
    pub debug: bool,
    /// Pre-supplied input values for `read`. `None` reads interactively.
    pub inputs: Option<Vec<String>>,
}

impl VmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = Some(inputs.into_iter().map(Into::into).collect());
        self
    }
}
