// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use crate::error::ConfigError;
use core::num::NonZero;

/// Construction parameters for a [`Manager`](crate::Manager).
///
/// # Examples
///
/// ```
/// use fitsim::Config;
/// use fitsim::ConfigError;
///
/// assert_eq!(Config::default().capacity().get(), 128);
/// assert_eq!(Config::new(64).map(|config| config.capacity().get()), Ok(64));
/// assert_eq!(Config::new(0), Err(ConfigError::ZeroCapacity));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Config {
    capacity: NonZero<usize>,
}

impl Config {
    /// Capacity of the arena used by [`Config::default()`].
    pub const DEFAULT_CAPACITY: NonZero<usize> = match NonZero::new(128) {
        Some(capacity) => capacity,
        None => unreachable!(),
    };

    /// Constructs a configuration for an arena of `capacity` units.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroCapacity`] if `capacity` is zero.
    #[inline]
    pub const fn new(capacity: usize) -> Result<Self, ConfigError> {
        match NonZero::new(capacity) {
            Some(capacity) => Ok(Self::with_capacity(capacity)),
            None => Err(ConfigError::ZeroCapacity),
        }
    }

    /// Constructs a configuration for an arena of `capacity` units.
    #[inline]
    #[must_use]
    pub const fn with_capacity(capacity: NonZero<usize>) -> Self {
        Self { capacity }
    }

    /// Total capacity of the arena.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> NonZero<usize> {
        self.capacity
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl TryFrom<usize> for Config {
    type Error = ConfigError;

    #[inline]
    fn try_from(capacity: usize) -> Result<Self, Self::Error> {
        Self::new(capacity)
    }
}
