use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Line reader over any async buffered input, stdin or a script.
#[derive(Debug)]
pub struct Prompt<R> {
    reader: R,
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Next line without its terminator, or `None` at end of input.
    ///
    /// # Errors
    /// Returns the underlying read error.
    pub async fn line(&mut self) -> io::Result<Option<String>> {
        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer).await? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Prompt;

    #[tokio::test]
    async fn reads_lines_until_eof() -> std::io::Result<()> {
        let mut prompt = Prompt::new("users list\r\n\nexit".as_bytes());
        assert_eq!(prompt.line().await?.as_deref(), Some("users list"));
        assert_eq!(prompt.line().await?.as_deref(), Some(""));
        assert_eq!(prompt.line().await?.as_deref(), Some("exit"));
        assert_eq!(prompt.line().await?, None);
        Ok(())
    }
}
