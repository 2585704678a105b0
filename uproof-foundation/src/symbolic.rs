// UPROOF - uproof-foundation
// Module: Symbolic Values
// SW-REQ-ID: REQ_VERIFY_001
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Nondeterministic scalars with declared domains.
//!
//! A [`Symbolic`] is a *description* of a value: its name, the set of values
//! it may take and optional named constraint predicates. It becomes concrete
//! only when a [`ProofContext`](crate::context::ProofContext) draws it from
//! the run's nondeterminism source, at which point the domain and every
//! constraint are written to the assumption ledger.
//!
//! Values travel through the sources as raw `u64` bit patterns; [`Scalar`]
//! converts between those and the Rust type.

use core::{fmt, marker::PhantomData};

/// Number of consecutive values below which a range is enumerated completely
pub const EXHAUSTIVE_LIMIT: u64 = 16;

/// Offset of the "slightly larger" representative above a lower bound
const ALIGN_STEP: u64 = 8;

/// Scalar types that can be drawn nondeterministically
pub trait Scalar: Copy + fmt::Debug + PartialEq + 'static {
    /// C-style name used in assumption descriptions
    const TYPE_NAME: &'static str;
    /// Largest bit pattern of the type
    const MAX_BITS: u64;

    /// Raw bit pattern of the value
    fn to_bits(self) -> u64;

    /// Rebuild a value from a bit pattern inside `0..=MAX_BITS`
    fn from_bits(bits: u64) -> Self;
}

macro_rules! impl_unsigned_scalar {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const TYPE_NAME: &'static str = $name;
                const MAX_BITS: u64 = <$ty>::MAX as u64;

                fn to_bits(self) -> u64 {
                    self as u64
                }

                fn from_bits(bits: u64) -> Self {
                    bits as $ty
                }
            }
        )*
    };
}

impl_unsigned_scalar!(u8 => "uint8_t", u16 => "uint16_t", u32 => "uint32_t", u64 => "uint64_t", usize => "size_t");

impl Scalar for bool {
    const TYPE_NAME: &'static str = "bool";
    const MAX_BITS: u64 = 1;

    fn to_bits(self) -> u64 {
        u64::from(self)
    }

    fn from_bits(bits: u64) -> Self {
        bits != 0
    }
}

/// Set of values a symbolic scalar may take, as raw bit patterns
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Every value in `min..=max`
    Range { min: u64, max: u64 },
    /// An explicit, sorted and deduplicated set
    OneOf(Vec<u64>),
}

impl Domain {
    /// Whole range of `T`
    pub fn full<T: Scalar>() -> Self {
        Self::Range { min: 0, max: T::MAX_BITS }
    }

    /// Every value of `T` that is `>= min`
    pub fn at_least<T: Scalar>(min: T) -> Self {
        Self::Range { min: min.to_bits(), max: T::MAX_BITS }
    }

    /// Closed range; empty when `min > max`
    pub fn range<T: Scalar>(min: T, max: T) -> Self {
        let (min, max) = (min.to_bits(), max.to_bits());
        if min > max {
            Self::OneOf(Vec::new())
        } else {
            Self::Range { min, max }
        }
    }

    /// Explicit value set
    pub fn one_of<T: Scalar>(values: &[T]) -> Self {
        let mut bits: Vec<u64> = values.iter().map(|value| value.to_bits()).collect();
        bits.sort_unstable();
        bits.dedup();
        Self::OneOf(bits)
    }

    pub fn contains(&self, bits: u64) -> bool {
        match self {
            Self::Range { min, max } => (*min..=*max).contains(&bits),
            Self::OneOf(values) => values.binary_search(&bits).is_ok(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Range { min, max } => min > max,
            Self::OneOf(values) => values.is_empty(),
        }
    }

    /// Smallest member, if any
    pub fn min(&self) -> Option<u64> {
        match self {
            Self::Range { min, .. } => Some(*min),
            Self::OneOf(values) => values.first().copied(),
        }
    }

    /// True when the domain admits every value of `T`
    pub fn is_full_for<T: Scalar>(&self) -> bool {
        self.is_full_for_max(T::MAX_BITS)
    }

    pub(crate) fn is_full_for_max(&self, type_max: u64) -> bool {
        matches!(self, Self::Range { min: 0, max } if *max == type_max)
    }

    /// True when [`representatives`](Self::representatives) lists every member
    pub fn is_enumerable(&self) -> bool {
        match self {
            Self::Range { min, max } => max.saturating_sub(*min) < EXHAUSTIVE_LIMIT,
            Self::OneOf(_) => true,
        }
    }

    /// Values the explicit explorer tries for this domain.
    ///
    /// Small domains are enumerated completely. Wide ranges are reduced to
    /// their boundary partition: the minimum, its successor, a slightly and a
    /// much larger block, the midpoint and the two largest values. For an
    /// allocation length this always includes blocks strictly larger than the
    /// target type.
    pub fn representatives(&self) -> Vec<u64> {
        match self {
            Self::OneOf(values) => values.clone(),
            Self::Range { min, max } if self.is_enumerable() => (*min..=*max).collect(),
            Self::Range { min, max } => {
                let (min, max) = (*min, *max);
                let mut values = vec![
                    min,
                    min + 1,
                    min.saturating_add(ALIGN_STEP),
                    min.saturating_mul(2),
                    min + (max - min) / 2,
                    max - 1,
                    max,
                ];
                values.retain(|value| (min..=max).contains(value));
                values.sort_unstable();
                values.dedup();
                values
            },
        }
    }

    /// Ledger text for a subject constrained to this domain, or `None` when
    /// the domain does not restrict a value of the given type at all
    pub fn describe(&self, subject: &str, type_max: u64) -> Option<String> {
        if self.is_full_for_max(type_max) {
            return None;
        }
        Some(match self {
            Self::Range { min, max } if *max == type_max => format!("{subject} >= {min}"),
            Self::Range { min, max } if min == max => format!("{subject} == {min}"),
            Self::Range { min, max } => format!("{min} <= {subject} <= {max}"),
            Self::OneOf(values) => {
                let listed: Vec<String> = values.iter().map(u64::to_string).collect();
                format!("{subject} in {{{}}}", listed.join(", "))
            },
        })
    }
}

/// Named predicate restricting a symbolic value beyond its domain
pub struct Constraint<T> {
    pub label:     &'static str,
    pub predicate: fn(T) -> bool,
}

impl<T> Clone for Constraint<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Constraint<T> {}

impl<T> fmt::Debug for Constraint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Declaration of a nondeterministic scalar
#[derive(Debug, Clone)]
pub struct Symbolic<T: Scalar> {
    name:           String,
    domain:         Domain,
    constraints:    Vec<Constraint<T>>,
    must_stay_free: bool,
    _marker:        PhantomData<T>,
}

impl<T: Scalar> Symbolic<T> {
    /// Unconstrained value over the whole range of `T`
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_domain(name, Domain::full::<T>())
    }

    pub fn with_domain(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
            constraints: Vec::new(),
            must_stay_free: false,
            _marker: PhantomData,
        }
    }

    pub fn at_least(name: impl Into<String>, min: T) -> Self {
        Self::with_domain(name, Domain::at_least(min))
    }

    pub fn in_range(name: impl Into<String>, min: T, max: T) -> Self {
        Self::with_domain(name, Domain::range(min, max))
    }

    pub fn one_of(name: impl Into<String>, values: &[T]) -> Self {
        Self::with_domain(name, Domain::one_of(values))
    }

    /// Add a named predicate; a drawn value failing it prunes the path
    pub fn constrain(mut self, label: &'static str, predicate: fn(T) -> bool) -> Self {
        self.constraints.push(Constraint { label, predicate });
        self
    }

    /// Mark the value as one the harness must never restrict. Any domain
    /// restriction, constraint or later assumption on it is reported as a
    /// coverage reduction.
    pub fn must_stay_free(mut self) -> Self {
        self.must_stay_free = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn constraints(&self) -> &[Constraint<T>] {
        &self.constraints
    }

    pub fn is_must_stay_free(&self) -> bool {
        self.must_stay_free
    }

    /// Full domain and no predicates
    pub fn is_unconstrained(&self) -> bool {
        self.constraints.is_empty() && self.domain.is_full_for::<T>()
    }
}
