use std::ops::Add;

/// What a widget wants done after handling an event.
#[must_use]
#[derive(Debug)]
pub enum Effect {
    None,
    Batch(Vec<Effect>),
    RequestRedraw,
}

impl Default for Effect {
    fn default() -> Self {
        Self::None
    }
}

impl Add for Effect {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        match (self, other) {
            (Self::None, y) => y,
            (x, Self::None) => x,
            (Self::Batch(mut xs), Self::Batch(ys)) => {
                xs.extend(ys);
                Self::Batch(xs)
            }
            (Self::Batch(mut xs), y) => {
                xs.push(y);
                Self::Batch(xs)
            }
            (x, Self::Batch(ys)) => {
                let mut xs = Vec::with_capacity(ys.len() + 1);
                xs.push(x);
                xs.extend(ys);
                Self::Batch(xs)
            }
            (x, y) => Self::Batch(vec![x, y]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_the_identity() {
        assert!(matches!(Effect::None + Effect::None, Effect::None));
        assert!(matches!(
            Effect::None + Effect::RequestRedraw,
            Effect::RequestRedraw
        ));
        assert!(matches!(
            Effect::RequestRedraw + Effect::None,
            Effect::RequestRedraw
        ));
    }

    #[test]
    fn test_batches_are_flattened() {
        let effect = Effect::RequestRedraw + Effect::RequestRedraw + Effect::RequestRedraw;
        match effect {
            Effect::Batch(effects) => assert_eq!(effects.len(), 3),
            other => panic!("expected a batch, got {:?}", other),
        }
    }
}
