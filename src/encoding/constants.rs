/// `N;`
pub(crate) const NULL: &[u8] = b"N;";
/// `b:1;`
pub(crate) const TRUE: &[u8] = b"b:1;";
/// `b:0;`
pub(crate) const FALSE: &[u8] = b"b:0;";

/// Integer prefix
pub(crate) const TYPE_INT: &[u8] = b"i:";
/// Float prefix
pub(crate) const TYPE_FLOAT: &[u8] = b"d:";
/// String prefix
pub(crate) const TYPE_STR: &[u8] = b"s:";

/// Array tag, for sequences, maps and records.
pub(crate) const TAG_ARRAY: u8 = b'a';
/// Named object tag.
pub(crate) const TAG_OBJECT: u8 = b'O';

pub(crate) const TERMINATOR: u8 = b';';
pub(crate) const SEP: u8 = b':';
pub(crate) const QUOTE: u8 = b'"';
pub(crate) const BLOCK_OPEN: u8 = b'{';
pub(crate) const BLOCK_CLOSE: u8 = b'}';

/// What a null map key is written as.
pub(crate) const EMPTY_KEY: &[u8] = b"s:0:\"\";";

/// The boolean spellings used by the `string` field option.
pub(crate) const TEXT_TRUE: &[u8] = b"true";
pub(crate) const TEXT_FALSE: &[u8] = b"false";
