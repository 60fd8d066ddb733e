use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Trait for game-specific timed effect kind enums.
pub trait EffectKind: Clone + Copy + PartialEq + Serialize + DeserializeOwned {
    /// Default duration in seconds when the effect is applied without an explicit one.
    fn duration(&self) -> f32;
}

/// Active timed effect on a fighter, generic over the kind enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ActiveEffect<K: EffectKind> {
    pub kind: K,
    pub remaining: f32,
}

impl<K: EffectKind> ActiveEffect<K> {
    pub fn new(kind: K) -> Self {
        Self {
            remaining: kind.duration(),
            kind,
        }
    }

    pub fn with_remaining(kind: K, remaining: f32) -> Self {
        Self { kind, remaining }
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// Spend part of the effect's budget (e.g. a shield absorbing a hit).
    pub fn consume(&mut self, amount: f32) {
        self.remaining = (self.remaining - amount).max(0.0);
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}
