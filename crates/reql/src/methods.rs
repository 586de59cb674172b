//! Chain methods on [`Term`]: `table.filter(pred)`, `time.to_iso8601()`, ...
//!
//! Every method is `self.apply(op, args)`, so the receiver becomes the
//! preceding term of the result.

use crate::ReqlError;
use crate::catalog::TermType;
use crate::term::Term;
use crate::value::Value;

macro_rules! chain_methods {
    ($( $(#[$meta:meta])* $method:ident => $op:ident ( $($arg:ident),* ); )*) => {
        impl Term {
            $(
                $(#[$meta])*
                pub fn $method(&self, $($arg: impl Into<Value>),*) -> Result<Term, ReqlError> {
                    let args: Vec<Value> = vec![$($arg.into()),*];
                    self.apply(TermType::$op, args)
                }
            )*
        }
    };
}

macro_rules! variadic_methods {
    ($( $(#[$meta:meta])* $method:ident => $op:ident; )*) => {
        impl Term {
            $(
                $(#[$meta])*
                pub fn $method<A>(&self, args: A) -> Result<Term, ReqlError>
                where
                    A: IntoIterator,
                    A::Item: Into<Value>,
                {
                    self.apply(TermType::$op, args)
                }
            )*
        }
    };
}

chain_methods! {
    // databases and tables
    table => Table(name);
    table_create => TableCreate(name);
    table_drop => TableDrop(name);
    table_list => TableList();
    config => Config();
    status => Status();
    sync => Sync();
    index_create => IndexCreate(name);
    index_drop => IndexDrop(name);
    index_list => IndexList();

    // writes
    insert => Insert(documents);
    update => Update(changes);
    replace => Replace(document);
    delete => Delete();

    // selection
    get => Get(key);
    between => Between(lower, upper);
    filter => Filter(predicate);

    // transformation
    map => Map(mapping);
    concat_map => ConcatMap(mapping);
    reduce => Reduce(reducer);
    fold => Fold(base, reducer);
    for_each => ForEach(write);
    skip => Skip(n);
    limit => Limit(n);
    slice => Slice(start, end);
    nth => Nth(index);
    sample => Sample(n);
    distinct => Distinct();
    is_empty => IsEmpty();
    zip => Zip();
    eq_join => EqJoin(field, table);
    inner_join => InnerJoin(other, predicate);
    outer_join => OuterJoin(other, predicate);
    changes => Changes();

    // aggregation
    count => Count();
    ungroup => Ungroup();
    sum => Sum(field);
    avg => Avg(field);
    min => Min(field);
    max => Max(field);

    // documents
    get_field => GetField(name);
    bracket => Bracket(key);
    merge => Merge(other);
    append => Append(value);
    prepend => Prepend(value);
    difference => Difference(values);
    keys => Keys();
    values => Values();
    default => Default(fallback);

    // math and logic
    rem => Mod(divisor);
    not => Not();
    floor => Floor();
    ceil => Ceil();
    round => Round();

    // strings
    /// Regex match, `MATCH` on the wire
    match_regex => Match(pattern);
    upcase => Upcase();
    downcase => Downcase();
    split => Split(separator);

    // time
    to_iso8601 => ToIso8601();
    to_epoch_time => ToEpochTime();
    in_timezone => InTimezone(timezone);
    during => During(start, end);
    date => Date();
    time_of_day => TimeOfDay();
    timezone => Timezone();
    year => Year();
    month => Month();
    day => Day();
    day_of_week => DayOfWeek();
    day_of_year => DayOfYear();
    hours => Hours();
    minutes => Minutes();
    seconds => Seconds();

    // types
    coerce_to => CoerceTo(type_name);
    type_of => TypeOf();
    info => Info();
    to_json_string => ToJsonString();
}

variadic_methods! {
    get_all => GetAll;
    pluck => Pluck;
    without => Without;
    has_fields => HasFields;
    contains => Contains;
    order_by => OrderBy;
    group => Group;
    union => Union;
    eq => Eq;
    ne => Ne;
    lt => Lt;
    le => Le;
    gt => Gt;
    ge => Ge;
    add => Add;
    sub => Sub;
    mul => Mul;
    div => Div;
    and => And;
    or => Or;
}

impl Term {
    /// `FUNCALL` puts the function first on the wire, so `f.call(args)`
    /// serializes as `[64, [f, args...]]`
    pub fn call<A>(&self, args: A) -> Result<Term, ReqlError>
    where
        A: IntoIterator,
        A::Item: Into<Value>,
    {
        self.apply(TermType::Funcall, args)
    }
}
