/// One hover resolution, as delivered to the presentation layer.
///
/// `feature: None` means "no country": the pointer missed the globe,
/// missed every polygon, or the dataset has not loaded yet. The anchor is
/// the matched feature's centroid on the unit sphere, advisory position
/// data for placing a marker or callout.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverUpdate {
    pub frame_index: u64,
    pub feature: Option<String>,
    pub anchor: Option<[f64; 3]>,
}

impl HoverUpdate {
    pub fn none(frame_index: u64) -> Self {
        Self {
            frame_index,
            feature: None,
            anchor: None,
        }
    }

    pub fn matched(frame_index: u64, feature: impl Into<String>, anchor: [f64; 3]) -> Self {
        Self {
            frame_index,
            feature: Some(feature.into()),
            anchor: Some(anchor),
        }
    }
}

/// Single-producer hover channel between the picking pipeline and the
/// presentation layer.
///
/// Updates are queued by `emit` and handed over by `drain` within the same
/// event turn; nothing is carried across pointer events. `latest` exposes
/// the most recent resolution for state queries.
#[derive(Debug, Default)]
pub struct HoverChannel {
    queued: Vec<HoverUpdate>,
    latest: Option<HoverUpdate>,
}

impl HoverChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, update: HoverUpdate) {
        self.latest = Some(update.clone());
        self.queued.push(update);
    }

    /// Most recent update, regardless of whether it has been drained.
    pub fn latest(&self) -> Option<&HoverUpdate> {
        self.latest.as_ref()
    }

    /// Currently hovered feature name, if any.
    pub fn hovered_feature(&self) -> Option<&str> {
        self.latest.as_ref()?.feature.as_deref()
    }

    pub fn drain(&mut self) -> Vec<HoverUpdate> {
        std::mem::take(&mut self.queued)
    }
}

#[cfg(test)]
mod tests {
    use super::{HoverChannel, HoverUpdate};

    #[test]
    fn emit_then_drain_hands_over_updates() {
        let mut channel = HoverChannel::new();
        channel.emit(HoverUpdate::matched(3, "Korea", [1.0, 0.0, 0.0]));
        let drained = channel.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].feature.as_deref(), Some("Korea"));
        assert!(channel.drain().is_empty());
    }

    #[test]
    fn latest_survives_drain() {
        let mut channel = HoverChannel::new();
        channel.emit(HoverUpdate::matched(0, "Japan", [0.0, 0.0, 1.0]));
        channel.drain();
        assert_eq!(channel.hovered_feature(), Some("Japan"));
    }

    #[test]
    fn clearing_overwrites_the_previous_match() {
        let mut channel = HoverChannel::new();
        channel.emit(HoverUpdate::matched(0, "Japan", [0.0, 0.0, 1.0]));
        channel.emit(HoverUpdate::none(1));
        assert_eq!(channel.hovered_feature(), None);
        assert_eq!(channel.drain().len(), 2);
    }
}
