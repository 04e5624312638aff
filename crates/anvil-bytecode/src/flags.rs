//! Method access and property flags.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bit set of method flags, a subset of the class file access flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct MethodFlags(u16);

impl MethodFlags {
    pub const PUBLIC: Self = Self(0x0001);
    pub const STATIC: Self = Self(0x0008);
    pub const FINAL: Self = Self(0x0010);
    pub const VARARGS: Self = Self(0x0080);
    pub const ABSTRACT: Self = Self(0x0400);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MethodFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MethodFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for MethodFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(MethodFlags, &str); 5] = [
            (MethodFlags::PUBLIC, "public"),
            (MethodFlags::STATIC, "static"),
            (MethodFlags::FINAL, "final"),
            (MethodFlags::VARARGS, "varargs"),
            (MethodFlags::ABSTRACT, "abstract"),
        ];

        f.write_str("[")?;
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        f.write_str("]")
    }
}
