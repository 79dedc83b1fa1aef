use super::{SqLiteEntity, WhereCondition};

/// Define a query to perform on the database, returning an iterator of a
/// defined entity.
///
/// Used as a parameter of
/// [fetch][crate::sqlite::ConnectionExtensions::fetch].
pub trait Query {
    /// Entity type returned by the result cursor.
    type Entity: SqLiteEntity;

    /// Return the filters to apply to the query.
    fn filters(&self) -> WhereCondition;

    /// Return the SQL definition of this query, with the expanded condition
    /// spliced in.
    fn get_definition(&self, condition: &str) -> String;
}
