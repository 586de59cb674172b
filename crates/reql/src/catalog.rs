//! Operation catalog
//!
//! One entry per query primitive: wire code, protocol name, accepted arity
//! and the option names the server understands. Term construction never
//! consults this table; [`validate`] is the layer that does.

use std::fmt;
use std::str::FromStr;

use crate::ReqlError;
use crate::term::Term;

/// Accepted argument counts and option names for one operation.
///
/// Arity counts the preceding term of a chained call as the first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub min: usize,
    /// `None` means variadic
    pub max: Option<usize>,
    pub optargs: &'static [&'static str],
}

impl Signature {
    pub fn accepts_arity(&self, n: usize) -> bool {
        n >= self.min && self.max.is_none_or(|max| n <= max)
    }

    pub fn accepts_optarg(&self, name: &str) -> bool {
        self.optargs.contains(&name)
    }

    /// Human-readable arity, e.g. `2`, `1 to 3`, `at least 1`
    pub fn describe_arity(&self) -> String {
        match self.max {
            Some(max) if max == self.min => max.to_string(),
            Some(max) => format!("{} to {}", self.min, max),
            None => format!("at least {}", self.min),
        }
    }
}

macro_rules! term_types {
    ($( $variant:ident = $code:literal, $name:literal, ($min:literal, $max:expr), [$($opt:literal),*]; )*) => {
        /// Query primitive selector
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TermType {
            $($variant,)*
        }

        impl TermType {
            pub const ALL: &'static [TermType] = &[$(TermType::$variant,)*];

            /// Numeric code sent on the wire
            pub fn code(self) -> u32 {
                match self {
                    $(TermType::$variant => $code,)*
                }
            }

            /// Protocol name, e.g. `TO_ISO8601`
            pub fn name(self) -> &'static str {
                match self {
                    $(TermType::$variant => $name,)*
                }
            }

            pub fn signature(self) -> Signature {
                match self {
                    $(TermType::$variant => Signature {
                        min: $min,
                        max: $max,
                        optargs: &[$($opt),*],
                    },)*
                }
            }
        }
    };
}

term_types! {
    Datum = 1, "DATUM", (0, Some(0)), [];
    MakeArray = 2, "MAKE_ARRAY", (0, None), [];
    MakeObj = 3, "MAKE_OBJ", (0, Some(0)), [];
    Var = 10, "VAR", (1, Some(1)), [];
    Javascript = 11, "JAVASCRIPT", (1, Some(1)), ["timeout"];
    Error = 12, "ERROR", (0, Some(1)), [];
    ImplicitVar = 13, "IMPLICIT_VAR", (0, Some(0)), [];
    Db = 14, "DB", (1, Some(1)), [];
    Table = 15, "TABLE", (1, Some(2)), ["read_mode", "identifier_format"];
    Get = 16, "GET", (2, Some(2)), [];
    Eq = 17, "EQ", (2, None), [];
    Ne = 18, "NE", (2, None), [];
    Lt = 19, "LT", (2, None), [];
    Le = 20, "LE", (2, None), [];
    Gt = 21, "GT", (2, None), [];
    Ge = 22, "GE", (2, None), [];
    Not = 23, "NOT", (1, Some(1)), [];
    Add = 24, "ADD", (1, None), [];
    Sub = 25, "SUB", (1, None), [];
    Mul = 26, "MUL", (1, None), [];
    Div = 27, "DIV", (1, None), [];
    Mod = 28, "MOD", (2, Some(2)), [];
    Append = 29, "APPEND", (2, Some(2)), [];
    Slice = 30, "SLICE", (2, Some(3)), ["left_bound", "right_bound"];
    GetField = 31, "GET_FIELD", (2, Some(2)), [];
    HasFields = 32, "HAS_FIELDS", (1, None), [];
    Pluck = 33, "PLUCK", (1, None), [];
    Without = 34, "WITHOUT", (1, None), [];
    Merge = 35, "MERGE", (1, None), [];
    Reduce = 37, "REDUCE", (2, Some(2)), [];
    Map = 38, "MAP", (2, None), [];
    Filter = 39, "FILTER", (2, Some(2)), ["default"];
    ConcatMap = 40, "CONCAT_MAP", (2, Some(2)), [];
    OrderBy = 41, "ORDER_BY", (1, None), ["index"];
    Distinct = 42, "DISTINCT", (1, Some(1)), ["index"];
    Count = 43, "COUNT", (1, Some(2)), [];
    Union = 44, "UNION", (0, None), ["interleave"];
    Nth = 45, "NTH", (2, Some(2)), [];
    InnerJoin = 48, "INNER_JOIN", (3, Some(3)), [];
    OuterJoin = 49, "OUTER_JOIN", (3, Some(3)), [];
    EqJoin = 50, "EQ_JOIN", (3, Some(3)), ["index", "ordered"];
    CoerceTo = 51, "COERCE_TO", (2, Some(2)), [];
    TypeOf = 52, "TYPE_OF", (1, Some(1)), [];
    Update = 53, "UPDATE", (2, Some(2)), ["durability", "return_changes", "non_atomic"];
    Delete = 54, "DELETE", (1, Some(1)), ["durability", "return_changes"];
    Replace = 55, "REPLACE", (2, Some(2)), ["durability", "return_changes", "non_atomic"];
    Insert = 56, "INSERT", (2, Some(2)), ["durability", "return_changes", "conflict"];
    DbCreate = 57, "DB_CREATE", (1, Some(1)), [];
    DbDrop = 58, "DB_DROP", (1, Some(1)), [];
    DbList = 59, "DB_LIST", (0, Some(0)), [];
    TableCreate = 60, "TABLE_CREATE", (1, Some(2)), ["primary_key", "shards", "replicas", "primary_replica_tag", "durability"];
    TableDrop = 61, "TABLE_DROP", (1, Some(2)), [];
    TableList = 62, "TABLE_LIST", (0, Some(1)), [];
    Funcall = 64, "FUNCALL", (1, None), [];
    Branch = 65, "BRANCH", (3, None), [];
    Or = 66, "OR", (0, None), [];
    And = 67, "AND", (0, None), [];
    ForEach = 68, "FOR_EACH", (2, Some(2)), [];
    Func = 69, "FUNC", (2, Some(2)), [];
    Skip = 70, "SKIP", (2, Some(2)), [];
    Limit = 71, "LIMIT", (2, Some(2)), [];
    Zip = 72, "ZIP", (1, Some(1)), [];
    Asc = 73, "ASC", (1, Some(1)), [];
    Desc = 74, "DESC", (1, Some(1)), [];
    IndexCreate = 75, "INDEX_CREATE", (2, Some(3)), ["multi", "geo"];
    IndexDrop = 76, "INDEX_DROP", (2, Some(2)), [];
    IndexList = 77, "INDEX_LIST", (1, Some(1)), [];
    GetAll = 78, "GET_ALL", (2, None), ["index"];
    Info = 79, "INFO", (1, Some(1)), [];
    Prepend = 80, "PREPEND", (2, Some(2)), [];
    Sample = 81, "SAMPLE", (2, Some(2)), [];
    IsEmpty = 86, "IS_EMPTY", (1, Some(1)), [];
    Default = 92, "DEFAULT", (2, Some(2)), [];
    Contains = 93, "CONTAINS", (1, None), [];
    Keys = 94, "KEYS", (1, Some(1)), [];
    Difference = 95, "DIFFERENCE", (2, Some(2)), [];
    Match = 97, "MATCH", (2, Some(2)), [];
    Json = 98, "JSON", (1, Some(1)), [];
    Iso8601 = 99, "ISO8601", (1, Some(1)), ["default_timezone"];
    ToIso8601 = 100, "TO_ISO8601", (1, Some(1)), [];
    EpochTime = 101, "EPOCH_TIME", (1, Some(1)), [];
    ToEpochTime = 102, "TO_EPOCH_TIME", (1, Some(1)), [];
    Now = 103, "NOW", (0, Some(0)), [];
    InTimezone = 104, "IN_TIMEZONE", (2, Some(2)), [];
    During = 105, "DURING", (3, Some(3)), ["left_bound", "right_bound"];
    Date = 106, "DATE", (1, Some(1)), [];
    TimeOfDay = 126, "TIME_OF_DAY", (1, Some(1)), [];
    Timezone = 127, "TIMEZONE", (1, Some(1)), [];
    Year = 128, "YEAR", (1, Some(1)), [];
    Month = 129, "MONTH", (1, Some(1)), [];
    Day = 130, "DAY", (1, Some(1)), [];
    DayOfWeek = 131, "DAY_OF_WEEK", (1, Some(1)), [];
    DayOfYear = 132, "DAY_OF_YEAR", (1, Some(1)), [];
    Hours = 133, "HOURS", (1, Some(1)), [];
    Minutes = 134, "MINUTES", (1, Some(1)), [];
    Seconds = 135, "SECONDS", (1, Some(1)), [];
    Time = 136, "TIME", (4, Some(7)), [];
    Literal = 137, "LITERAL", (0, Some(1)), [];
    Sync = 138, "SYNC", (1, Some(1)), [];
    IndexStatus = 139, "INDEX_STATUS", (1, None), [];
    IndexWait = 140, "INDEX_WAIT", (1, None), [];
    Upcase = 141, "UPCASE", (1, Some(1)), [];
    Downcase = 142, "DOWNCASE", (1, Some(1)), [];
    Object = 143, "OBJECT", (0, None), [];
    Group = 144, "GROUP", (1, None), ["index", "multi"];
    Sum = 145, "SUM", (1, Some(2)), [];
    Avg = 146, "AVG", (1, Some(2)), [];
    Min = 147, "MIN", (1, Some(2)), ["index"];
    Max = 148, "MAX", (1, Some(2)), ["index"];
    Split = 149, "SPLIT", (1, Some(3)), [];
    Ungroup = 150, "UNGROUP", (1, Some(1)), [];
    Random = 151, "RANDOM", (0, Some(2)), ["float"];
    Changes = 152, "CHANGES", (1, Some(1)), ["squash", "changefeed_queue_size", "include_initial", "include_states", "include_offsets", "include_types"];
    Http = 153, "HTTP", (1, Some(1)), ["data", "timeout", "method", "params", "header", "attempts", "redirects", "verify", "page", "page_limit", "auth", "result_format"];
    Args = 154, "ARGS", (1, Some(1)), [];
    Binary = 155, "BINARY", (1, Some(1)), [];
    IndexRename = 156, "INDEX_RENAME", (3, Some(3)), ["overwrite"];
    Uuid = 169, "UUID", (0, Some(1)), [];
    Bracket = 170, "BRACKET", (2, Some(2)), [];
    ToJsonString = 172, "TO_JSON_STRING", (1, Some(1)), [];
    Range = 173, "RANGE", (0, Some(2)), [];
    Config = 174, "CONFIG", (1, Some(1)), [];
    Status = 175, "STATUS", (1, Some(1)), [];
    Wait = 177, "WAIT", (0, Some(1)), ["wait_for", "timeout"];
    Minval = 180, "MINVAL", (0, Some(0)), [];
    Maxval = 181, "MAXVAL", (0, Some(0)), [];
    Between = 182, "BETWEEN", (3, Some(3)), ["index", "left_bound", "right_bound"];
    Floor = 183, "FLOOR", (1, Some(1)), [];
    Ceil = 184, "CEIL", (1, Some(1)), [];
    Round = 185, "ROUND", (1, Some(1)), [];
    Values = 186, "VALUES", (1, Some(1)), [];
    Fold = 187, "FOLD", (3, Some(3)), ["emit", "final_emit"];
}

impl TermType {
    /// Method name used when printing a term, e.g. `to_iso8601`
    pub fn method_name(self) -> String {
        self.name().to_ascii_lowercase()
    }

    pub fn from_code(code: u32) -> Option<TermType> {
        TermType::ALL.iter().copied().find(|t| t.code() == code)
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TermType {
    type Err = ReqlError;

    /// Accepts protocol names case-insensitively (`TO_ISO8601`, `to_iso8601`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TermType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReqlError::UnknownOperation(s.to_string()))
    }
}

impl TryFrom<u32> for TermType {
    type Error = ReqlError;

    fn try_from(code: u32) -> Result<Self, ReqlError> {
        TermType::from_code(code).ok_or_else(|| ReqlError::UnknownOperation(code.to_string()))
    }
}

// ============ Validation ============

/// Check a whole tree against the catalog.
///
/// Reports the first violation found in depth-first order. `MAKE_OBJ`
/// fields are object keys, not options, and are not checked.
pub fn validate(term: &Term) -> Result<(), ReqlError> {
    let mut pending = vec![term];
    while let Some(term) = pending.pop() {
        check(term)?;
        let children: Vec<&Term> = term
            .effective_args()
            .chain(term.optargs().map(|(_, value)| value))
            .collect();
        pending.extend(children.into_iter().rev());
    }
    Ok(())
}

/// Arity and option names of one node, ignoring its children
fn check(term: &Term) -> Result<(), ReqlError> {
    if term.is_datum() {
        return Ok(());
    }

    let op = term.op();
    let signature = op.signature();
    let found = term.arity();
    if !signature.accepts_arity(found) {
        log::debug!("rejecting {op}: {found} arguments");
        return Err(ReqlError::ArityMismatch {
            op,
            expected: signature.describe_arity(),
            found,
        });
    }

    if op != TermType::MakeObj
        && let Some(name) = term
            .optargs()
            .map(|(name, _)| name)
            .find(|name| !signature.accepts_optarg(name))
    {
        log::debug!("rejecting {op}: unknown option {name}");
        return Err(ReqlError::UnknownOption {
            op,
            name: name.to_string(),
        });
    }
    Ok(())
}
