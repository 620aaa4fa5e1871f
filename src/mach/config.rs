/// ## Interpreter limits and switches

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Forward diagnostics to the host's debug sink.
    pub debug: bool,
    /// Dispatcher steps before a run is aborted.
    pub max_steps: usize,
    /// Largest `count × commands` a single Logo REPEAT may expand to.
    pub max_repeat_expansion: usize,
    pub max_macro_depth: usize,
    pub max_procedure_depth: usize,
    /// Commands one Logo line may execute, nested blocks included.
    pub max_commands_per_line: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            debug: false,
            max_steps: 100_000,
            max_repeat_expansion: 5_000,
            max_macro_depth: 16,
            max_procedure_depth: 64,
            max_commands_per_line: 10_000,
        }
    }
}
