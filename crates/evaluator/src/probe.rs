/// Frontier discovery over the per-season game-code space.
///
/// Game codes are assigned monotonically as games are played, so the edge of
/// available data is found by probing codes upward until enough consecutive
/// misses accumulate. Misses are expected (future games simply do not exist
/// yet) and are not errors. The state machine keeps the termination rule
/// testable apart from any network code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Probing,
    Stopped,
}

#[derive(Debug)]
pub struct FrontierProbe {
    next_code: u32,
    consecutive_misses: u32,
    stop_after: u32,
    probes_left: u32,
}

impl FrontierProbe {
    /// Start probing just past `last_known_code`. `stop_after` consecutive
    /// misses end the walk; `max_probes` is a generous safety cap on total
    /// candidates per run.
    pub fn new(last_known_code: u32, stop_after: u32, max_probes: u32) -> Self {
        Self {
            next_code: last_known_code + 1,
            consecutive_misses: 0,
            stop_after,
            probes_left: max_probes,
        }
    }

    pub fn status(&self) -> ProbeStatus {
        if self.consecutive_misses >= self.stop_after || self.probes_left == 0 {
            ProbeStatus::Stopped
        } else {
            ProbeStatus::Probing
        }
    }

    /// Next candidate game code, or None once the walk has stopped.
    pub fn next_candidate(&mut self) -> Option<u32> {
        if self.status() == ProbeStatus::Stopped {
            return None;
        }
        let code = self.next_code;
        self.next_code += 1;
        self.probes_left -= 1;
        Some(code)
    }

    /// Record a successful fetch for the last candidate.
    pub fn hit(&mut self) {
        self.consecutive_misses = 0;
    }

    /// Record a miss for the last candidate and report the resulting state.
    pub fn miss(&mut self) -> ProbeStatus {
        self.consecutive_misses += 1;
        self.status()
    }

    pub fn consecutive_misses(&self) -> u32 {
        self.consecutive_misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_after_consecutive_miss_threshold() {
        let mut probe = FrontierProbe::new(10, 3, 1000);
        assert_eq!(probe.next_candidate(), Some(11));
        assert_eq!(probe.miss(), ProbeStatus::Probing);
        assert_eq!(probe.next_candidate(), Some(12));
        assert_eq!(probe.miss(), ProbeStatus::Probing);
        assert_eq!(probe.next_candidate(), Some(13));
        assert_eq!(probe.miss(), ProbeStatus::Stopped);
        assert_eq!(probe.next_candidate(), None);
    }

    #[test]
    fn test_hit_resets_miss_counter() {
        let mut probe = FrontierProbe::new(0, 2, 1000);
        let _ = probe.next_candidate();
        probe.miss();
        let _ = probe.next_candidate();
        probe.hit();
        assert_eq!(probe.consecutive_misses(), 0);
        // A fresh streak is required to stop again.
        let _ = probe.next_candidate();
        assert_eq!(probe.miss(), ProbeStatus::Probing);
        let _ = probe.next_candidate();
        assert_eq!(probe.miss(), ProbeStatus::Stopped);
    }

    #[test]
    fn test_probe_cap_bounds_candidates() {
        let mut probe = FrontierProbe::new(100, 5, 2);
        assert_eq!(probe.next_candidate(), Some(101));
        probe.hit();
        assert_eq!(probe.next_candidate(), Some(102));
        probe.hit();
        // Cap exhausted even though every probe was a hit.
        assert_eq!(probe.next_candidate(), None);
        assert_eq!(probe.status(), ProbeStatus::Stopped);
    }

    #[test]
    fn test_candidates_are_sequential_from_last_known() {
        let mut probe = FrontierProbe::new(41, 5, 10);
        let codes: Vec<u32> = std::iter::from_fn(|| {
            let c = probe.next_candidate();
            probe.hit();
            c
        })
        .take(4)
        .collect();
        assert_eq!(codes, vec![42, 43, 44, 45]);
    }
}
