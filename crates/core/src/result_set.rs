use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

/// Bit-flag descriptor attached to each emitted statement, telling the
/// caller how to interpret the result sets coming back from the batch.
///
/// The empty set ([`Self::NO_RESULT_SET`]) means the statement produces no
/// result set at all. A statement with a result set carries exactly one of
/// the position flags, plus [`Self::ROWS_AFFECTED_ONLY`] when the set holds
/// a verification count instead of column data.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultSetMapping(u8);

impl ResultSetMapping {
    pub const NO_RESULT_SET: Self = Self(0);
    pub const LAST_IN_RESULT_SET: Self = Self(1);
    pub const NOT_LAST_IN_RESULT_SET: Self = Self(1 << 1);
    pub const ROWS_AFFECTED_ONLY: Self = Self(1 << 2);

    #[must_use]
    pub const fn contains(self, flags: Self) -> bool {
        self.0 & flags.0 == flags.0
    }

    #[must_use]
    pub const fn is_no_result_set(self) -> bool {
        self.0 == 0
    }

    /// True when the statement's result set carries column data rather than
    /// only an affected-row count.
    #[must_use]
    pub const fn has_row_data(self) -> bool {
        !self.is_no_result_set() && !self.contains(Self::ROWS_AFFECTED_ONLY)
    }
}

impl BitOr for ResultSetMapping {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ResultSetMapping {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ResultSetMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_result_set() {
            return f.write_str("NoResultSet");
        }

        let mut first = true;
        for (flag, name) in [
            (Self::LAST_IN_RESULT_SET, "LastInResultSet"),
            (Self::NOT_LAST_IN_RESULT_SET, "NotLastInResultSet"),
            (Self::ROWS_AFFECTED_ONLY, "RowsAffectedOnly"),
        ] {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }

        Ok(())
    }
}
