use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Result of a point-membership query against a solid or a face.
///
/// Each variant occupies its own bit so that sets of acceptable results
/// can be expressed as a [`MembershipMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Membership {
    /// The query could not be resolved.
    Unknown = 1,
    /// Strictly inside the solid.
    In = 2,
    /// On the boundary, within tolerance.
    On = 4,
    /// Strictly outside the solid.
    Out = 8,
    /// Parts of the queried entity fall in different classes.
    Composite = 16,
}

impl Membership {
    pub fn mask(self) -> MembershipMask {
        MembershipMask(self as u8)
    }
}

/// A set of [`Membership`] values, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipMask(pub u8);

impl MembershipMask {
    pub const EMPTY: Self = Self(0);
    pub const IN_OR_ON: Self = Self(Membership::In as u8 | Membership::On as u8);
    pub const OUT_OR_ON: Self = Self(Membership::Out as u8 | Membership::On as u8);
    pub const ANY: Self = Self(
        Membership::Unknown as u8
            | Membership::In as u8
            | Membership::On as u8
            | Membership::Out as u8
            | Membership::Composite as u8,
    );

    pub fn contains(self, membership: Membership) -> bool {
        self.0 & membership as u8 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for MembershipMask {
    type Output = MembershipMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        MembershipMask(self.0 | rhs.0)
    }
}

impl BitOr<Membership> for MembershipMask {
    type Output = MembershipMask;
    fn bitor(self, rhs: Membership) -> Self::Output {
        MembershipMask(self.0 | rhs as u8)
    }
}

impl BitOr for Membership {
    type Output = MembershipMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        MembershipMask(self as u8 | rhs as u8)
    }
}

impl From<Membership> for MembershipMask {
    fn from(membership: Membership) -> Self {
        membership.mask()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_are_distinct_bits() {
        let all = [
            Membership::Unknown,
            Membership::In,
            Membership::On,
            Membership::Out,
            Membership::Composite,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_eq!(*a as u8 & *b as u8, 0);
            }
        }
    }

    #[test]
    fn test_in_or_on() {
        assert!(MembershipMask::IN_OR_ON.contains(Membership::In));
        assert!(MembershipMask::IN_OR_ON.contains(Membership::On));
        assert!(!MembershipMask::IN_OR_ON.contains(Membership::Out));
        assert!(!MembershipMask::IN_OR_ON.contains(Membership::Unknown));
    }

    #[test]
    fn test_bitor_builds_masks() {
        let mask = Membership::In | Membership::Out;
        assert!(mask.contains(Membership::In));
        assert!(mask.contains(Membership::Out));
        let wider = mask | Membership::Composite;
        assert!(wider.contains(Membership::Composite));
    }

    #[test]
    fn test_any_covers_everything() {
        for m in [
            Membership::Unknown,
            Membership::In,
            Membership::On,
            Membership::Out,
            Membership::Composite,
        ] {
            assert!(MembershipMask::ANY.contains(m));
        }
        assert!(MembershipMask::EMPTY.is_empty());
    }
}
