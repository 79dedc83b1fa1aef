use anyhow::Context;
use sqlite::{ReadableWithIndex, Value};

use crate::StdResult;

use super::{EntityCursor, Query, SqliteConnection};

/// Extension trait gathering the query execution helpers of the
/// [SqliteConnection] type.
pub trait ConnectionExtensions {
    /// Execute the given query and return a cursor over the hydrated
    /// entities.
    fn fetch<Q: Query>(&self, query: Q) -> StdResult<EntityCursor<Q::Entity>>;

    /// Execute the given query and return the first entity if any.
    fn fetch_first<Q: Query>(&self, query: Q) -> StdResult<Option<Q::Entity>>;

    /// Execute the given query and collect all entities in a vec.
    fn fetch_collect<Q: Query, B: FromIterator<Q::Entity>>(&self, query: Q) -> StdResult<B>;

    /// Execute the given query, dropping its results.
    ///
    /// Meant for `insert … returning` / `delete … returning` statements
    /// whose output is not needed.
    fn apply<Q: Query>(&self, query: Q) -> StdResult<()>;

    /// Execute the given sql query and return the value of the first cell
    /// read.
    fn query_single_cell<Q: AsRef<str>, T: ReadableWithIndex>(
        &self,
        sql: Q,
        params: &[Value],
    ) -> StdResult<T>;
}

impl ConnectionExtensions for SqliteConnection {
    fn fetch<Q: Query>(&self, query: Q) -> StdResult<EntityCursor<Q::Entity>> {
        let (condition, params) = query.filters().expand();
        let sql = query.get_definition(&condition);
        let cursor = self
            .prepare(&sql)
            .with_context(|| {
                format!(
                    "Prepare query error: SQL=`{}`",
                    &sql.replace('\n', " ").trim()
                )
            })?
            .into_iter()
            .bind(&params[..])?;

        Ok(EntityCursor::new(cursor))
    }

    fn fetch_first<Q: Query>(&self, query: Q) -> StdResult<Option<Q::Entity>> {
        let mut cursor = self.fetch(query)?;

        Ok(cursor.next())
    }

    fn fetch_collect<Q: Query, B: FromIterator<Q::Entity>>(&self, query: Q) -> StdResult<B> {
        Ok(self.fetch(query)?.collect())
    }

    fn apply<Q: Query>(&self, query: Q) -> StdResult<()> {
        for _entity in self.fetch(query)? {}

        Ok(())
    }

    fn query_single_cell<Q: AsRef<str>, T: ReadableWithIndex>(
        &self,
        sql: Q,
        params: &[Value],
    ) -> StdResult<T> {
        let mut statement = self.prepare(&sql).with_context(|| {
            format!(
                "Prepare query error: SQL=`{}`",
                sql.as_ref().replace('\n', " ").trim()
            )
        })?;
        statement.bind(params)?;
        statement.next()?;
        statement.read::<T, _>(0).with_context(|| "Read query error")
    }
}

#[cfg(test)]
mod tests {
    use sqlite::Connection;

    use super::*;

    #[test]
    fn query_single_cell_string() {
        let connection = Connection::open_thread_safe(":memory:").unwrap();
        let value: String = connection.query_single_cell("select 'test'", &[]).unwrap();

        assert_eq!("test", value);
    }

    #[test]
    fn query_single_cell_with_params() {
        let connection = Connection::open_thread_safe(":memory:").unwrap();
        let value: i64 = connection
            .query_single_cell(
                "select max(a) from (select 10 a union select 45 a union select 90 a) \
                where a < ?",
                &[Value::Integer(90)],
            )
            .unwrap();

        assert_eq!(45, value);
    }
}
