pub mod prompt;
pub mod transport;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar used while icons are downloaded. Hidden automatically when
/// stderr is not a terminal.
pub fn icon_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    // Falls back to the default style if the template is rejected.
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
