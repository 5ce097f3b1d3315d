//! Profile cycling on button press.

use std::sync::Arc;

use thumbmouse_atomic::PipelineCounters;
use thumbmouse_source::IndicatorSink;
use tracing::{info, warn};

use crate::profile::{ProfileSet, ShapingProfile};
use crate::selector::ProfileSelector;

/// Advances the active profile and shows its colour.
///
/// Owned by the input-edge handler. Indicator failures are logged and
/// otherwise ignored; the profile change itself always takes effect.
pub struct ModeCycler {
    selector: ProfileSelector,
    profiles: Arc<ProfileSet>,
    indicator: Box<dyn IndicatorSink>,
    counters: Option<Arc<PipelineCounters>>,
}

impl std::fmt::Debug for ModeCycler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeCycler")
            .field("selector", &self.selector)
            .field("profiles", &self.profiles.len())
            .finish_non_exhaustive()
    }
}

impl ModeCycler {
    /// Cycler over `profiles`, writing through `selector`.
    pub fn new(
        selector: ProfileSelector,
        profiles: Arc<ProfileSet>,
        indicator: Box<dyn IndicatorSink>,
    ) -> Self {
        Self {
            selector,
            profiles,
            indicator,
            counters: None,
        }
    }

    /// Count profile switches in `counters`.
    #[must_use]
    pub fn with_counters(mut self, counters: Arc<PipelineCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// Profile currently selected.
    pub fn active(&self) -> &ShapingProfile {
        self.profiles.at(self.selector.current())
    }

    /// Handle one press: advance, then recolour once.
    ///
    /// Returns the new index.
    pub fn on_press(&mut self) -> usize {
        let index = self.selector.advance();
        if let Some(counters) = &self.counters {
            counters.inc_profile_switch();
        }
        info!(index, profile = %self.profiles.at(index).name, "shaping profile changed");
        self.show(index);
        index
    }

    /// Show the colour of the active profile without advancing.
    pub fn refresh(&mut self) {
        self.show(self.selector.current());
    }

    fn show(&mut self, index: usize) {
        let Some(color) = self.profiles.at(index).color else {
            return;
        };
        if let Err(e) = self.indicator.set_color(color) {
            warn!(error = %e, "failed to update profile indicator");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use thumbmouse_errors::MouseError;
    use thumbmouse_source::IndicatorColor;

    #[derive(Clone, Default)]
    struct Seen(Arc<Mutex<Vec<IndicatorColor>>>);

    impl IndicatorSink for Seen {
        fn set_color(&mut self, color: IndicatorColor) -> thumbmouse_errors::Result<()> {
            self.0
                .lock()
                .map_err(|_poisoned| MouseError::bad_instance("poisoned"))?
                .push(color);
            Ok(())
        }
    }

    struct Broken;

    impl IndicatorSink for Broken {
        fn set_color(&mut self, _color: IndicatorColor) -> thumbmouse_errors::Result<()> {
            Err(MouseError::bad_instance("no led"))
        }
    }

    fn colors(seen: &Seen) -> Vec<IndicatorColor> {
        seen.0.lock().map(|v| v.clone()).unwrap_or_default()
    }

    #[test]
    fn test_press_advances_and_colours_once() -> Result<(), thumbmouse_errors::ValidationError> {
        let profiles = Arc::new(ProfileSet::builtin());
        let selector = ProfileSelector::new(profiles.len(), 0)?;
        let seen = Seen::default();
        let mut cycler = ModeCycler::new(selector.clone(), profiles, Box::new(seen.clone()));

        assert_eq!(cycler.on_press(), 1);
        assert_eq!(selector.current(), 1);
        assert_eq!(colors(&seen), [IndicatorColor::new(0, 64, 0, 0)]);
        assert_eq!(cycler.active().name, "normal");
        Ok(())
    }

    #[test]
    fn test_indicator_failure_is_not_fatal() -> Result<(), thumbmouse_errors::ValidationError> {
        let profiles = Arc::new(ProfileSet::builtin());
        let selector = ProfileSelector::new(profiles.len(), 2)?;
        let counters = Arc::new(PipelineCounters::new());
        let mut cycler = ModeCycler::new(selector.clone(), profiles, Box::new(Broken))
            .with_counters(Arc::clone(&counters));

        assert_eq!(cycler.on_press(), 0);
        assert_eq!(selector.current(), 0);
        assert_eq!(counters.snapshot().profile_switches, 1);
        Ok(())
    }

    #[test]
    fn test_uncoloured_profile_skips_indicator() -> Result<(), thumbmouse_errors::ValidationError> {
        let profiles = Arc::new(ProfileSet::new(vec![
            ShapingProfile::linear("a", 1.0),
            ShapingProfile::linear("b", 2.0),
        ])?);
        let selector = ProfileSelector::new(profiles.len(), 0)?;
        let seen = Seen::default();
        let mut cycler = ModeCycler::new(selector, profiles, Box::new(seen.clone()));
        cycler.on_press();
        cycler.refresh();
        assert!(colors(&seen).is_empty());
        Ok(())
    }
}
