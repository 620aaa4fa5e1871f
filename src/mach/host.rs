use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// ## Host boundary
///
/// Everything the interpreters need from whoever embeds them: an output
/// sink, a diagnostic sink and a blocking line of user input.

pub trait Host {
    fn log_output(&mut self, text: &str);
    fn debug_output(&mut self, text: &str);
    fn get_user_input(&mut self, prompt: &str) -> String;
}

/// Prints to stdout and reads stdin.
#[derive(Debug, Default)]
pub struct Console;

impl Host for Console {
    fn log_output(&mut self, text: &str) {
        println!("{}", text);
    }

    fn debug_output(&mut self, text: &str) {
        eprintln!("{}", text);
    }

    fn get_user_input(&mut self, prompt: &str) -> String {
        use std::io::Write;
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(_) => line.trim_end_matches(&['\r', '\n'][..]).to_string(),
            Err(_) => String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Captured {
    output: Vec<String>,
    debug: Vec<String>,
    prompts: Vec<String>,
    input: VecDeque<String>,
}

/// In-memory host with canned input. Clones share state so a test can keep
/// a handle after giving one to the runtime.
#[derive(Debug, Default, Clone)]
pub struct Capture {
    inner: Rc<RefCell<Captured>>,
}

impl Capture {
    pub fn new() -> Capture {
        Capture::default()
    }

    pub fn with_input<I, S>(input: I) -> Capture
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let capture = Capture::new();
        capture
            .inner
            .borrow_mut()
            .input
            .extend(input.into_iter().map(Into::into));
        capture
    }

    pub fn output(&self) -> Vec<String> {
        self.inner.borrow().output.clone()
    }

    pub fn debug(&self) -> Vec<String> {
        self.inner.borrow().debug.clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.inner.borrow().prompts.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.output.clear();
        inner.debug.clear();
        inner.prompts.clear();
    }
}

impl Host for Capture {
    fn log_output(&mut self, text: &str) {
        self.inner.borrow_mut().output.push(text.to_string());
    }

    fn debug_output(&mut self, text: &str) {
        self.inner.borrow_mut().debug.push(text.to_string());
    }

    /// Empty string once the canned input runs out.
    fn get_user_input(&mut self, prompt: &str) -> String {
        let mut inner = self.inner.borrow_mut();
        inner.prompts.push(prompt.to_string());
        inner.input.pop_front().unwrap_or_default()
    }
}
