use strum_macros::IntoStaticStr;

/// Local names of the MathML elements the rewriters read or create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MathTag {
    Math,
    Mrow,
    Mo,
    Mtr,
    Mtd,
    Mfenced,
    Mlabeledtr,
    Mstack,
    Mlongdiv,
}

impl MathTag {
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Marker attribute put on an `<mo>` created by the fenced expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum OperatorRole {
    Fence,
    Separator,
}
