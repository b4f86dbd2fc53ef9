use geodesy::Coordinate;

/// Which slot the next click fills.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Slot {
    Origin,
    Destination,
    /// Both slots taken; further clicks are ignored until a clear.
    Full,
}

/// Outcome of one recorded click.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    OriginSet,
    /// Destination just landed; origin and destination are both set.
    SelectionComplete,
    /// Third click without a clear in between. Deliberately a no-op.
    Ignored,
}

/// At most one origin and one destination, filled by successive clicks.
///
/// Coordinates are assumed already resolved from screen position by the map
/// layer; no validation happens here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_click(&mut self, point: Coordinate) -> ClickOutcome {
        if self.origin.is_none() {
            self.origin = Some(point);
            ClickOutcome::OriginSet
        } else if self.destination.is_none() {
            self.destination = Some(point);
            ClickOutcome::SelectionComplete
        } else {
            ClickOutcome::Ignored
        }
    }

    /// Empties both slots unconditionally.
    pub fn clear(&mut self) {
        self.origin = None;
        self.destination = None;
    }

    pub fn next_slot(&self) -> Slot {
        match (self.origin, self.destination) {
            (None, _) => Slot::Origin,
            (Some(_), None) => Slot::Destination,
            (Some(_), Some(_)) => Slot::Full,
        }
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn is_complete(&self) -> bool {
        self.origin.is_some() && self.destination.is_some()
    }

    /// Both endpoints, once the selection is complete.
    pub fn pair(&self) -> Option<(Coordinate, Coordinate)> {
        Some((self.origin?, self.destination?))
    }
}
