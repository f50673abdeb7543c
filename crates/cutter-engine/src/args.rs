// crates/cutter-engine/src/args.rs
//
// The one tunable `render()` exposes beyond the input, output and cut
// list: a quality knob, unused on the discard-based stream-copy path but
// kept end-to-end since the FFI surface (render.h) and its re-encode
// fallback both expect it.

/// Describes one argument `render()` accepts, independent of any
/// particular host language's calling convention.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentSpec {
    pub short_name: char,
    pub long_name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub is_flag: bool,
}

pub const ARGUMENTS: &[ArgumentSpec] = &[ArgumentSpec {
    short_name: 'q',
    long_name: "quality",
    description: "Encoder quality to use if a cut boundary forces a re-encode",
    required: false,
    is_flag: false,
}];

/// Parsed argument values for one `render()` call.
#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub quality: u32,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self { quality: 23 }
    }
}

impl RenderArgs {
    /// Parses `(name, value)` pairs as received across an FFI or CLI
    /// boundary, falling back to the default for anything unrecognized or
    /// unparsable rather than failing the whole render.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut args = Self::default();
        for (name, value) in pairs {
            if name == "quality" {
                if let Ok(q) = value.parse() {
                    args.quality = q;
                }
            }
        }
        args
    }
}
