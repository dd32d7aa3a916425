use indicatif::{ProgressBar, ProgressStyle};
use reelfeed_core::ProgressEvent;
use std::io::IsTerminal;

/// Progress display for `fetch`: a spinner with a per-item counter when
/// attached to a terminal, structured log lines otherwise.
#[derive(Clone)]
pub struct FetchUI {
    bar: ProgressBar,
    interactive: bool,
}

impl FetchUI {
    pub fn new(enabled: bool) -> Self {
        let interactive = enabled && is_interactive();
        let bar = if interactive {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")
            {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            bar.set_message("Fetching feed...");
            bar
        } else {
            ProgressBar::hidden()
        };

        Self { bar, interactive }
    }

    pub fn handle(&self, event: &ProgressEvent) {
        if !self.interactive {
            tracing::debug!(operation = "progress", event = ?event, "Pipeline progress");
            return;
        }

        match event {
            ProgressEvent::FeedLoaded { selected, .. } => {
                self.bar.set_length(*selected as u64);
                self.bar.set_message("Processing reviews...");
            }
            ProgressEvent::ItemStarted { title, .. } => {
                self.bar.set_message(title.clone());
            }
            ProgressEvent::ItemFinished { .. } | ProgressEvent::ItemSkipped { .. } => {
                self.bar.inc(1);
            }
        }
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
