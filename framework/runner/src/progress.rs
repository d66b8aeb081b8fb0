use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use seq_load_core::prelude::DelegatedShutdownListener;
use std::cmp::min;
use std::fmt::Write;
use std::time::{Duration, Instant};

/// Displays a progress bar while a duration bound run is going to show the user how long is left.
pub(crate) fn start_progress(
    planned_runtime: Duration,
    mut shutdown_listener: DelegatedShutdownListener,
) {
    let spawned = std::thread::Builder::new()
        .name("progress".to_string())
        .spawn(move || {
            let start_time = Instant::now();
            let style = match ProgressStyle::with_template(
                "{spinner:.green} [{wide_bar:.cyan/blue}] [{elapsed_precise} / {planned_runtime}]",
            ) {
                Ok(style) => style,
                Err(e) => {
                    log::warn!("Not showing progress, invalid progress style: {e}");
                    return;
                }
            };
            let pb = ProgressBar::new(planned_runtime.as_secs());
            pb.set_style(
                style
                    .with_key("planned_runtime", {
                        let hours = planned_runtime.as_secs() / 3600;
                        let minutes = (planned_runtime.as_secs() % 3600) / 60;
                        let seconds = planned_runtime.as_secs() % 60;
                        move |_state: &ProgressState, w: &mut dyn Write| {
                            let _ = write!(w, "{hours:02}:{minutes:02}:{seconds:02}");
                        }
                    })
                    .progress_chars("#>-"),
            );

            loop {
                if shutdown_listener.should_shutdown() {
                    log::trace!("Progress thread shutting down");
                    pb.finish_and_clear();
                    break;
                }

                let new = min(start_time.elapsed().as_secs(), planned_runtime.as_secs());
                pb.set_position(new);
                std::thread::sleep(Duration::from_millis(250));
            }
        });

    if let Err(e) = spawned {
        log::warn!("Failed to start progress thread: {e}");
    }
}
