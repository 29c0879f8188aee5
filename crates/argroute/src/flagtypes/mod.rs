//! Built-in flag types.
//!
//! Each scalar parser (`bool`, `string`, `int`, `uint`, `float`, `timestamp`,
//! `duration`) has a repeatable counterpart, [`ListParser`], that converts
//! every occurrence with the scalar parser and appends it to the values bound
//! so far.

mod error;
mod scalar;

use std::fmt;
use std::sync::Arc;

pub use error::FlagTypeError;
pub use scalar::{
    BoolParser, DurationParser, FloatParser, IntParser, StringParser, TimeParser, UintParser,
};

use crate::flag::{ConvertError, FlagParser, FlagValue, ParseContext, Value};

/// A parser for one scalar shape of [`Value`].
pub trait ScalarParser: fmt::Debug + Default + Send + Sync + 'static {
    type Item: Clone;

    /// Tag of the single-value form.
    const TYPE: &'static str;
    /// Tag of the repeatable form.
    const LIST_TYPE: &'static str;

    fn convert(&self, raw: &str) -> Result<Self::Item, FlagTypeError>;

    /// Canonical text for an item, used to rebuild list raw values.
    fn format(item: &Self::Item) -> String;

    fn single(item: Self::Item) -> Value;

    fn list(items: Vec<Self::Item>) -> Value;

    fn items(value: &Value) -> Option<&[Self::Item]>;
}

macro_rules! scalar_flag_parser {
    ($($parser:ty),* $(,)?) => {
        $(
            impl FlagParser for $parser {
                fn parse(
                    &self,
                    _ctx: &ParseContext<'_>,
                    name: &str,
                    value: &str,
                    _prior: Option<&FlagValue>,
                ) -> Result<FlagValue, ConvertError> {
                    let item = self.convert(value)?;
                    Ok(FlagValue::new(name, value, <$parser as ScalarParser>::single(item)))
                }

                fn flag_type(&self) -> &str {
                    <$parser as ScalarParser>::TYPE
                }
            }
        )*
    };
}

scalar_flag_parser!(
    BoolParser,
    StringParser,
    IntParser,
    UintParser,
    FloatParser,
    TimeParser,
    DurationParser,
);

/// Repeatable form of a scalar parser.
///
/// The bound value's raw text is the `", "`-joined rendering of every item so
/// far, since there's no meaningful way to keep each occurrence's own text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParser<P>(P);

impl<P: ScalarParser> ListParser<P> {
    pub fn new(parser: P) -> Self {
        Self(parser)
    }
}

impl<P: ScalarParser> FlagParser for ListParser<P> {
    fn parse(
        &self,
        _ctx: &ParseContext<'_>,
        name: &str,
        value: &str,
        prior: Option<&FlagValue>,
    ) -> Result<FlagValue, ConvertError> {
        let mut items = match prior {
            None => Vec::new(),
            Some(prior) => P::items(prior.value())
                .ok_or_else(|| FlagTypeError::UnexpectedPriorType {
                    name: name.to_string(),
                    expected: P::LIST_TYPE,
                    got: prior.value().type_name(),
                })?
                .to_vec(),
        };
        items.push(self.0.convert(value)?);
        let raw = items.iter().map(P::format).collect::<Vec<_>>().join(", ");
        Ok(FlagValue::new(name, raw, P::list(items)))
    }

    fn flag_type(&self) -> &str {
        P::LIST_TYPE
    }
}

pub type BoolListParser = ListParser<BoolParser>;
pub type StringListParser = ListParser<StringParser>;
pub type IntListParser = ListParser<IntParser>;
pub type UintListParser = ListParser<UintParser>;
pub type FloatListParser = ListParser<FloatParser>;
pub type TimeListParser = ListParser<TimeParser>;
pub type DurationListParser = ListParser<DurationParser>;

/// Every built-in type tag, singular forms first.
pub const TYPE_TAGS: &[&str] = &[
    "bool",
    "string",
    "int",
    "uint",
    "float",
    "timestamp",
    "duration",
    "[]bool",
    "[]string",
    "[]int",
    "[]uint",
    "[]float",
    "[]timestamp",
    "[]duration",
];

/// The built-in parser for a type tag, if there is one.
pub fn parser_for_type(tag: &str) -> Option<Arc<dyn FlagParser>> {
    let parser: Arc<dyn FlagParser> = match tag {
        "bool" => Arc::new(BoolParser),
        "string" => Arc::new(StringParser),
        "int" => Arc::new(IntParser),
        "uint" => Arc::new(UintParser),
        "float" => Arc::new(FloatParser),
        "timestamp" => Arc::new(TimeParser),
        "duration" => Arc::new(DurationParser),
        "[]bool" => Arc::new(BoolListParser::default()),
        "[]string" => Arc::new(StringListParser::default()),
        "[]int" => Arc::new(IntListParser::default()),
        "[]uint" => Arc::new(UintListParser::default()),
        "[]float" => Arc::new(FloatListParser::default()),
        "[]timestamp" => Arc::new(TimeListParser::default()),
        "[]duration" => Arc::new(DurationListParser::default()),
        _ => return None,
    };
    Some(parser)
}
