use crate::lang::{block, Language};
use std::collections::HashMap;

/// One logical program line. BASIC lines carry their line number with the
/// number stripped from `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLine {
    pub number: Option<u32>,
    pub text: String,
}

/// ## Loaded program
///
/// The pre-pass splits source into logical lines and builds the labels
/// table. Labels map to line indices, never to BASIC line numbers.

#[derive(Debug, Default, Clone)]
pub struct Program {
    lines: Vec<ProgramLine>,
    labels: HashMap<String, usize>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn load(source: &str, language: Language) -> Program {
        let mut program = Program::new();
        let physical: Vec<&str> = source.lines().collect();
        match language {
            Language::Basic => {
                for line in physical.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
                    program.push_numbered(line);
                }
            }
            Language::Pilot => {
                for line in physical.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
                    if let Some(label) = line.strip_prefix('*') {
                        let name = label.split_whitespace().next().unwrap_or("");
                        program.insert_label(name, program.lines.len());
                    }
                    program.push(None, line);
                }
            }
            Language::Logo => {
                for (_, line) in block::join_lines(&physical) {
                    let mut words = line.split_whitespace();
                    if let (Some(to), Some(name)) = (words.next(), words.next()) {
                        if to.eq_ignore_ascii_case("TO") {
                            program.insert_label(name, program.lines.len());
                        }
                    }
                    program.push(None, &line);
                }
            }
            Language::Prolog => {
                for clause in join_until(&physical, |text| text.ends_with('.'), "%") {
                    program.push(None, &clause);
                }
            }
            Language::Forth => {
                let definition_open = |text: &str| {
                    let words: Vec<&str> = text.split_whitespace().collect();
                    let opened = words.iter().rposition(|w| *w == ":");
                    let closed = words.iter().rposition(|w| *w == ";");
                    match (opened, closed) {
                        (Some(o), Some(c)) => c > o,
                        (Some(_), None) => false,
                        _ => true,
                    }
                };
                for text in join_until(&physical, definition_open, "\\") {
                    program.push(None, &text);
                }
            }
            _ => {
                for line in physical.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
                    program.push(None, line);
                }
            }
        }
        program
    }

    fn push_numbered(&mut self, line: &str) {
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        let number = if digits > 0 {
            line[..digits].parse::<u32>().ok()
        } else {
            None
        };
        match number {
            Some(n) => self.push(Some(n), line[digits..].trim()),
            None => self.push(None, line),
        }
    }

    pub fn push(&mut self, number: Option<u32>, text: &str) {
        self.lines.push(ProgramLine {
            number,
            text: text.to_string(),
        });
    }

    pub fn insert_label(&mut self, name: &str, index: usize) {
        self.labels
            .entry(name.to_ascii_uppercase())
            .or_insert(index);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.labels.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&ProgramLine> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> &[ProgramLine] {
        &self.lines
    }

    /// Index of the first line carrying BASIC line number `number`.
    pub fn find_line_number(&self, number: u32) -> Option<usize> {
        self.lines.iter().position(|l| l.number == Some(number))
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(&name.trim().to_ascii_uppercase()).copied()
    }
}

/// Join physical lines until `complete` accepts the accumulated text. Lines
/// starting with `comment` are dropped.
fn join_until<F: Fn(&str) -> bool>(physical: &[&str], complete: F, comment: &str) -> Vec<String> {
    let mut out = vec![];
    let mut pending = String::new();
    for line in physical.iter().map(|l| l.trim()) {
        if line.is_empty() || line.starts_with(comment) {
            continue;
        }
        if !pending.is_empty() {
            pending.push(' ');
        }
        pending.push_str(line);
        if complete(&pending) {
            out.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        out.push(pending);
    }
    out
}
