//! Request: the structured form a parsed command line is turned into.

use serde::{Deserialize, Serialize};

use crate::error::MemfsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Write,
    Read,
    Delete,
    List,
}

/// Structured request `{operation, file_count, filenames, contents}`.
///
/// `file_count` is the count the caller declared (`-n <count>`), which may
/// disagree with what was actually supplied; [`Request::validate`] catches that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub operation: Operation,
    pub file_count: usize,
    pub filenames: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<String>,
    #[serde(default)]
    pub long_format: bool,
}

impl Request {
    pub fn create(filenames: Vec<String>) -> Self {
        Self {
            operation: Operation::Create,
            file_count: filenames.len(),
            filenames,
            contents: Vec::new(),
            long_format: false,
        }
    }

    pub fn write(pairs: Vec<(String, String)>) -> Self {
        let file_count = pairs.len();
        let (filenames, contents) = pairs.into_iter().unzip();
        Self {
            operation: Operation::Write,
            file_count,
            filenames,
            contents,
            long_format: false,
        }
    }

    pub fn read(filename: impl Into<String>) -> Self {
        Self {
            operation: Operation::Read,
            file_count: 1,
            filenames: vec![filename.into()],
            contents: Vec::new(),
            long_format: false,
        }
    }

    pub fn delete(filenames: Vec<String>) -> Self {
        Self {
            operation: Operation::Delete,
            file_count: filenames.len(),
            filenames,
            contents: Vec::new(),
            long_format: false,
        }
    }

    pub fn list(long_format: bool) -> Self {
        Self {
            operation: Operation::List,
            file_count: 0,
            filenames: Vec::new(),
            contents: Vec::new(),
            long_format,
        }
    }

    /// Override the declared count (as `-n <count>` does).
    pub fn with_declared_count(mut self, file_count: usize) -> Self {
        self.file_count = file_count;
        self
    }

    /// Check that the declared count matches the supplied names/contents.
    pub fn validate(&self) -> Result<(), MemfsError> {
        let names = self.filenames.len();
        let contents = self.contents.len();
        let ok = match self.operation {
            Operation::Create | Operation::Delete => names == self.file_count,
            Operation::Write => names == self.file_count && contents == self.file_count,
            Operation::Read => names == 1 && self.file_count == 1,
            Operation::List => true,
        };
        if ok {
            Ok(())
        } else {
            Err(MemfsError::CountMismatch {
                expected: self.file_count,
                names,
                contents,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}.txt")).collect()
    }

    #[test]
    fn constructors_are_consistent() {
        assert!(Request::create(names(3)).validate().is_ok());
        assert!(Request::delete(names(2)).validate().is_ok());
        assert!(Request::read("a.txt").validate().is_ok());
        assert!(Request::list(true).validate().is_ok());

        let w = Request::write(vec![("a.txt".into(), "x".into()), ("b.txt".into(), "y".into())]);
        assert_eq!(w.file_count, 2);
        assert_eq!(w.contents, vec!["x".to_string(), "y".to_string()]);
        assert!(w.validate().is_ok());
    }

    #[rstest]
    #[case::create_too_few(Request::create(names(2)).with_declared_count(3))]
    #[case::delete_too_many(Request::delete(names(4)).with_declared_count(3))]
    fn declared_count_must_match(#[case] request: Request) {
        let err = request.validate().unwrap_err();
        assert!(matches!(err, MemfsError::CountMismatch { expected: 3, .. }));
    }

    #[test]
    fn write_needs_one_content_per_name() {
        let mut w = Request::write(vec![("a.txt".into(), "x".into()), ("b.txt".into(), "y".into())]);
        w.contents.pop();
        let err = w.validate().unwrap_err();
        assert_eq!(
            err,
            MemfsError::CountMismatch {
                expected: 2,
                names: 2,
                contents: 1
            }
        );
    }
}
