use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

/// Line input plus text output for the shell
pub struct Terminal<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    /// Next input line, `None` at end of input
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    pub async fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }

    /// Ask a yes/no question; anything but an explicit yes declines
    pub async fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        self.write(&format!("{} [y/N] ", prompt)).await?;
        let answer = self.read_line().await?.unwrap_or_default();
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_defaults_to_no() {
        let mut terminal = Terminal::new(&b"yes\n\nn\n"[..], Vec::new());
        assert!(terminal.confirm("Really?").await.unwrap());
        assert!(!terminal.confirm("Really?").await.unwrap());
        assert!(!terminal.confirm("Really?").await.unwrap());
        assert!(!terminal.confirm("Really?").await.unwrap());

        let output = String::from_utf8(terminal.into_output()).unwrap();
        assert!(output.starts_with("Really? [y/N] "));
    }
}
