use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use resmap::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Drives one progress bar counting mapped models across all entries.
///
/// Callbacks from several entries may run concurrently; each entry start
/// extends the bar by its model count.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::bar_style())
            .with_message("Mapping");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::EntryStart {
                    id_code,
                    total_models,
                } => {
                    pb_guard.inc_length(total_models);
                    pb_guard.set_message(id_code);
                }
                Progress::ModelMapped { .. } => {
                    pb_guard.inc(1);
                }
                Progress::EntryFinish => {}
                Progress::Message(msg) => {
                    pb_guard.println(format!("  {}", msg));
                }
            }
        })
    }

    pub fn finish(&self) {
        if let Ok(pb_guard) = self.pb.lock() {
            pb_guard.finish_and_clear();
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
