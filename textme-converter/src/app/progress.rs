use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Build a progress bar that tracks sources as they are decoded
pub fn build_progress_bar_decode(total_sources: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_sources);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed}] [{bar:.blue}] {pos}/{len} ({per_sec}, ETA: {eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_position(0);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
