use std::marker::PhantomData;

use sqlite::CursorWithOwnership;

use super::SqLiteEntity;

/// Iterator over query result rows, hydrated into entities.
pub struct EntityCursor<'a, T> {
    cursor: CursorWithOwnership<'a>,
    phantom: PhantomData<T>,
}

impl<'a, T> EntityCursor<'a, T> {
    /// EntityCursor factory
    pub fn new(cursor: CursorWithOwnership<'a>) -> Self {
        Self {
            cursor,
            phantom: PhantomData,
        }
    }
}

impl<T> Iterator for EntityCursor<'_, T>
where
    T: SqLiteEntity,
{
    type Item = T;

    /// Hydrate entities from the row iterator.
    ///
    /// This panics if a row cannot be read or hydrated, it prevents
    /// inconsistent data from spreading across the application.
    fn next(&mut self) -> Option<T> {
        self.cursor
            .next()
            .map(|row| T::hydrate(row.unwrap()).unwrap())
    }
}
