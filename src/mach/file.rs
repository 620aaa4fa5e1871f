use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Input,
    Output,
    Append,
}

enum Handle {
    Reader(Lines<BufReader<File>>),
    Writer(BufWriter<File>),
}

/// ## Open file table
///
/// BASIC `#n` handles. Everything still open is flushed and closed when
/// the table is cleared or dropped.

#[derive(Default)]
pub struct Files {
    handles: HashMap<i64, Handle>,
}

impl std::fmt::Debug for Files {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut open: Vec<&i64> = self.handles.keys().collect();
        open.sort();
        write!(f, "Files {:?}", open)
    }
}

impl Files {
    pub fn new() -> Files {
        Files::default()
    }

    pub fn open(&mut self, number: i64, path: &str, mode: Mode) -> Result<()> {
        if self.handles.contains_key(&number) {
            return Err(error!(BadFileNumber; "FILE ALREADY OPEN"));
        }
        let handle = match mode {
            Mode::Input => match File::open(path) {
                Ok(f) => Handle::Reader(BufReader::new(f).lines()),
                Err(_) => return Err(error!(FileNotFound; path)),
            },
            Mode::Output | Mode::Append => {
                let mut options = OpenOptions::new();
                if mode == Mode::Append {
                    options.append(true).create(true);
                } else {
                    options.write(true).create(true).truncate(true);
                }
                match options.open(path) {
                    Ok(f) => Handle::Writer(BufWriter::new(f)),
                    Err(_) => return Err(error!(DiskIoError; path)),
                }
            }
        };
        self.handles.insert(number, handle);
        Ok(())
    }

    /// Next line from an input handle; `None` at end of file.
    pub fn read_line(&mut self, number: i64) -> Result<Option<String>> {
        match self.handles.get_mut(&number) {
            Some(Handle::Reader(lines)) => match lines.next() {
                Some(Ok(line)) => Ok(Some(line)),
                Some(Err(_)) => Err(error!(DiskIoError)),
                None => Ok(None),
            },
            Some(Handle::Writer(_)) => Err(error!(BadFileNumber; "FILE NOT OPEN FOR INPUT")),
            None => Err(error!(BadFileNumber)),
        }
    }

    pub fn write_line(&mut self, number: i64, text: &str) -> Result<()> {
        match self.handles.get_mut(&number) {
            Some(Handle::Writer(w)) => match writeln!(w, "{}", text) {
                Ok(()) => Ok(()),
                Err(_) => Err(error!(DiskIoError)),
            },
            Some(Handle::Reader(_)) => Err(error!(BadFileNumber; "FILE NOT OPEN FOR OUTPUT")),
            None => Err(error!(BadFileNumber)),
        }
    }

    pub fn close(&mut self, number: i64) -> Result<()> {
        match self.handles.remove(&number) {
            Some(Handle::Writer(mut w)) => match w.flush() {
                Ok(()) => Ok(()),
                Err(_) => Err(error!(DiskIoError)),
            },
            Some(Handle::Reader(_)) => Ok(()),
            None => Err(error!(BadFileNumber)),
        }
    }

    pub fn close_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            if let Handle::Writer(mut w) = handle {
                let _ = w.flush();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for Files {
    fn drop(&mut self) {
        self.close_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let path = std::env::temp_dir().join(format!("timewarp-files-{}.txt", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let mut files = Files::new();
        files.open(1, &path, Mode::Output).unwrap();
        files.write_line(1, "alpha").unwrap();
        assert!(files.read_line(1).is_err());
        files.close(1).unwrap();
        files.open(2, &path, Mode::Input).unwrap();
        assert_eq!(files.read_line(2).unwrap(), Some("alpha".to_string()));
        assert_eq!(files.read_line(2).unwrap(), None);
        files.close_all();
        assert!(files.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing() {
        let mut files = Files::new();
        assert!(files.open(1, "/nonexistent/timewarp/nope.txt", Mode::Input).is_err());
        assert!(files.close(3).is_err());
    }
}
