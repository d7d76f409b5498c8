//! Named entities accepted in parsed documents.
//!
//! XHTML pages that embed MathML routinely use HTML named entities, which an XML parser does
//! not know about. This table covers the XML predefined entities plus the HTML/MathML ones
//! that show up in math markup.

static NAMED_ENTITIES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "quot" => "\"",
    "amp" => "&",
    "apos" => "'",
    "lt" => "<",
    "gt" => ">",
    "nbsp" => "\u{00A0}",
    "ensp" => "\u{2002}",
    "emsp" => "\u{2003}",
    "thinsp" => "\u{2009}",
    "ThinSpace" => "\u{2009}",
    "MediumSpace" => "\u{205F}",
    "NewLine" => "\n",
    "ApplyFunction" => "\u{2061}",
    "af" => "\u{2061}",
    "InvisibleTimes" => "\u{2062}",
    "it" => "\u{2062}",
    "InvisibleComma" => "\u{2063}",
    "ic" => "\u{2063}",
    "middot" => "\u{00B7}",
    "times" => "\u{00D7}",
    "divide" => "\u{00F7}",
    "minus" => "\u{2212}",
    "plusmn" => "\u{00B1}",
    "PlusMinus" => "\u{00B1}",
    "le" => "\u{2264}",
    "ge" => "\u{2265}",
    "ne" => "\u{2260}",
    "equiv" => "\u{2261}",
    "approx" => "\u{2248}",
    "infin" => "\u{221E}",
    "sum" => "\u{2211}",
    "prod" => "\u{220F}",
    "int" => "\u{222B}",
    "part" => "\u{2202}",
    "nabla" => "\u{2207}",
    "radic" => "\u{221A}",
    "isin" => "\u{2208}",
    "notin" => "\u{2209}",
    "sub" => "\u{2282}",
    "sup" => "\u{2283}",
    "cap" => "\u{2229}",
    "cup" => "\u{222A}",
    "forall" => "\u{2200}",
    "exist" => "\u{2203}",
    "empty" => "\u{2205}",
    "larr" => "\u{2190}",
    "rarr" => "\u{2192}",
    "harr" => "\u{2194}",
    "lArr" => "\u{21D0}",
    "rArr" => "\u{21D2}",
    "hArr" => "\u{21D4}",
    "lang" => "\u{27E8}",
    "rang" => "\u{27E9}",
    "lceil" => "\u{2308}",
    "rceil" => "\u{2309}",
    "lfloor" => "\u{230A}",
    "rfloor" => "\u{230B}",
    "Vert" => "\u{2016}",
    "verbar" => "|",
    "hellip" => "\u{2026}",
    "prime" => "\u{2032}",
    "Prime" => "\u{2033}",
    "deg" => "\u{00B0}",
    "alpha" => "\u{03B1}",
    "beta" => "\u{03B2}",
    "gamma" => "\u{03B3}",
    "delta" => "\u{03B4}",
    "epsilon" => "\u{03B5}",
    "theta" => "\u{03B8}",
    "lambda" => "\u{03BB}",
    "mu" => "\u{03BC}",
    "pi" => "\u{03C0}",
    "sigma" => "\u{03C3}",
    "phi" => "\u{03C6}",
    "omega" => "\u{03C9}",
    "Gamma" => "\u{0393}",
    "Delta" => "\u{0394}",
    "Sigma" => "\u{03A3}",
    "Omega" => "\u{03A9}",
};

/// Resolve a named entity (without `&` and `;`).
///
/// Numeric character references are handled by the tokenizer and never reach this function.
#[inline]
pub(crate) fn resolve_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}
