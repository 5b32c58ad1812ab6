use super::Console;
use crate::{
    cli::output::render_item,
    features::dashboard::client::{LOAD_FAILED, fetch_stats},
};
use std::io::{self, Write};
use tokio::io::AsyncBufRead;

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    pub(super) async fn dashboard(&mut self) -> io::Result<()> {
        match fetch_stats(self.session.gateway()).await {
            Ok(stats) => {
                let rendered = render_item(&stats, self.format);
                self.say(&rendered)
            }
            Err(err) => self.report(&err, LOAD_FAILED),
        }
    }
}
