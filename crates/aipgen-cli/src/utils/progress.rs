use aipgen::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;

/// What the terminal shows while a molecule is footprinted.
struct Display {
    bar: ProgressBar,
    phase: &'static str,
    /// AIPs emitted so far in the current footprinting pass.
    aips: usize,
}

impl Display {
    fn apply(&mut self, event: Progress) {
        match event {
            Progress::PhaseStart { name } => {
                self.phase = name;
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(phase_style());
                self.bar.set_message(name);
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar.finish_with_message(format!("{} ✓", self.phase));
            }
            Progress::TaskStart { total_steps } => {
                self.aips = 0;
                self.bar.disable_steady_tick();
                self.bar.reset();
                self.bar.set_style(atom_style());
                self.bar.set_length(total_steps);
                self.bar.set_message(format!("{}: 0 AIPs", self.phase));
            }
            Progress::AtomFinished { index, aips } => {
                self.aips += aips;
                self.bar.set_position(index as u64 + 1);
                self.bar
                    .set_message(format!("{}: {} AIPs", self.phase, self.aips));
            }
            Progress::TaskFinish => {
                if let Some(atoms) = self.bar.length() {
                    self.bar.set_position(atoms);
                }
                self.bar.finish_with_message(format!(
                    "{}: {} AIPs",
                    self.phase, self.aips
                ));
            }
            Progress::Message(text) => self.bar.println(text),
        }
    }
}

fn phase_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn atom_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<28} [{bar:36.cyan/blue}] atom {pos}/{len} ({eta_precise})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

/// Per-phase spinner and per-atom bar on stderr for the `footprint` command.
#[derive(Clone)]
pub struct FootprintProgress {
    display: Arc<Mutex<Display>>,
}

impl FootprintProgress {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(phase_style());
        Self {
            display: Arc::new(Mutex::new(Display {
                bar,
                phase: "",
                aips: 0,
            })),
        }
    }

    /// Callback that forwards engine events to the terminal.
    pub fn callback(&self) -> ProgressCallback<'static> {
        let display = Arc::clone(&self.display);
        Box::new(move |event| match display.lock() {
            Ok(mut display) => display.apply(event),
            Err(_) => warn!("Progress display lock poisoned; dropping {:?}.", event),
        })
    }
}

impl Default for FootprintProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden() -> FootprintProgress {
        FootprintProgress::with_target(ProgressDrawTarget::hidden())
    }

    fn snapshot(progress: &FootprintProgress) -> (String, u64, Option<u64>, bool) {
        let display = progress.display.lock().unwrap();
        (
            display.bar.message(),
            display.bar.position(),
            display.bar.length(),
            display.bar.is_finished(),
        )
    }

    #[test]
    fn atom_bar_accumulates_emitted_aips() {
        let progress = hidden();
        let callback = progress.callback();

        callback(Progress::PhaseStart { name: "Footprinting" });
        assert_eq!(snapshot(&progress).0, "Footprinting");

        callback(Progress::TaskStart { total_steps: 3 });
        callback(Progress::AtomFinished { index: 0, aips: 2 });
        callback(Progress::AtomFinished { index: 1, aips: 0 });
        let (message, position, length, _) = snapshot(&progress);
        assert_eq!(message, "Footprinting: 2 AIPs");
        assert_eq!(position, 2);
        assert_eq!(length, Some(3));

        callback(Progress::AtomFinished { index: 2, aips: 1 });
        callback(Progress::TaskFinish);
        let (message, position, _, finished) = snapshot(&progress);
        assert_eq!(message, "Footprinting: 3 AIPs");
        assert_eq!(position, 3);
        assert!(finished);
    }

    #[test]
    fn phases_close_with_their_own_name() {
        let progress = hidden();
        let callback = progress.callback();
        for name in ["Atom Typing", "Surface Statistics"] {
            callback(Progress::PhaseStart { name });
            assert!(!snapshot(&progress).3);
            callback(Progress::PhaseFinish);
            let (message, _, _, finished) = snapshot(&progress);
            assert_eq!(message, format!("{name} ✓"));
            assert!(finished);
        }
    }

    #[test]
    fn a_new_task_resets_the_running_total() {
        let progress = hidden();
        let callback = progress.callback();
        callback(Progress::PhaseStart { name: "Footprinting" });
        callback(Progress::TaskStart { total_steps: 1 });
        callback(Progress::AtomFinished { index: 0, aips: 4 });
        callback(Progress::TaskStart { total_steps: 2 });
        let (message, position, length, _) = snapshot(&progress);
        assert_eq!(message, "Footprinting: 0 AIPs");
        assert_eq!(position, 0);
        assert_eq!(length, Some(2));
    }
}
