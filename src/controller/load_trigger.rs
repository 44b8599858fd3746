//! Issues one dataset load per new dataset path.

use web_time::Instant;

/// Watches the dataset path and requests a load whenever it changes.
///
/// Requests are fire-and-forget: completion shows up later in the store's
/// loaded flags, so nothing is held between calls to [`LoadTrigger::observe`]
/// except the path and time of the last request.
pub struct LoadTrigger {
    last_requested: Option<String>,
    requested_at: Option<Instant>,
}

impl Default for LoadTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadTrigger {
    pub fn new() -> Self {
        Self {
            last_requested: None,
            requested_at: None,
        }
    }

    pub fn last_requested(&self) -> Option<&str> {
        self.last_requested.as_deref()
    }

    /// Time since the last request was issued.
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.requested_at.map(|at| at.elapsed())
    }

    /// Observes the current dataset path.
    ///
    /// Returns true when a load must be submitted. Paths are compared by
    /// value against the last requested one; an absent path never fires and
    /// does not reset that comparison.
    pub fn observe(&mut self, datapath: Option<&str>) -> bool {
        let Some(datapath) = datapath.filter(|p| !p.is_empty()) else {
            return false;
        };
        if self.last_requested.as_deref() == Some(datapath) {
            return false;
        }

        log::info!("Requesting load of dataset {}", datapath);
        self.last_requested = Some(datapath.to_string());
        self.requested_at = Some(Instant::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_sequence(paths: &[Option<&str>]) -> Vec<String> {
        let mut trigger = LoadTrigger::new();
        paths
            .iter()
            .filter_map(|path| {
                trigger
                    .observe(*path)
                    .then(|| path.unwrap_or_default().to_string())
            })
            .collect()
    }

    #[test]
    fn test_first_path_fires() {
        let mut trigger = LoadTrigger::new();
        assert!(trigger.elapsed().is_none());
        assert!(trigger.observe(Some("zika")));
        assert_eq!(trigger.last_requested(), Some("zika"));
        assert!(trigger.elapsed().is_some());
    }

    #[test]
    fn test_unchanged_path_does_not_refire() {
        let mut trigger = LoadTrigger::new();
        assert!(trigger.observe(Some("zika")));
        assert!(!trigger.observe(Some("zika")));
        let copy = String::from("zika");
        assert!(!trigger.observe(Some(copy.as_str())));
    }

    #[test]
    fn test_fired_request_is_not_held_as_pending() {
        let mut trigger = LoadTrigger::new();
        assert!(trigger.observe(Some("zika")));

        // Unrelated observations after firing neither refire nor report the old request.
        assert!(!trigger.observe(None));
        assert!(!trigger.observe(Some("zika")));
        assert!(trigger.observe(Some("ebola")));
        assert_eq!(trigger.last_requested(), Some("ebola"));
    }

    #[test]
    fn test_one_request_per_distinct_change_in_order() {
        let fired = fire_sequence(&[
            None,
            Some("zika"),
            Some("zika"),
            Some("ebola"),
            Some("zika"),
            Some("zika"),
            Some("flu/h3n2"),
        ]);
        assert_eq!(fired, vec!["zika", "ebola", "zika", "flu/h3n2"]);
    }

    #[test]
    fn test_absent_and_empty_paths_never_fire() {
        let fired = fire_sequence(&[None, Some(""), None]);
        assert!(fired.is_empty());
    }

    #[test]
    fn test_absent_path_does_not_reset_comparison() {
        let fired = fire_sequence(&[Some("zika"), None, Some("zika")]);
        assert_eq!(fired, vec!["zika"]);
    }
}
