use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use cinch_solver::termination::TerminationCondition;
use log::warn;
use signal_hook::consts::SIGINT;
use signal_hook::consts::SIGTERM;

/// Stops the search once SIGINT or SIGTERM was received; the runner then reports the best
/// solution it has.
#[derive(Clone, Debug)]
pub(crate) struct OsSignal {
    received: Arc<AtomicBool>,
    reported: bool,
}

impl OsSignal {
    pub(crate) fn install() -> std::io::Result<OsSignal> {
        let received = Arc::new(AtomicBool::new(false));
        for signal in [SIGINT, SIGTERM] {
            let _ = signal_hook::flag::register(signal, Arc::clone(&received))?;
        }

        Ok(OsSignal {
            received,
            reported: false,
        })
    }
}

impl TerminationCondition for OsSignal {
    fn should_stop(&mut self) -> bool {
        let stop = self.received.load(Ordering::Relaxed);
        if stop && !self.reported {
            warn!("interrupted, stopping the search");
            self.reported = true;
        }

        stop
    }
}
