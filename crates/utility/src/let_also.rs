/// Scope functions for writing transformations as one expression chain.
pub trait LetAlso: Sized {
    /// Passes the value by ownership into `f` and returns its result.
    fn let_owned<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }

    /// Runs `f` on a mutable borrow and hands the value back.
    fn also<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        f(&mut self);
        self
    }
}

impl<T> LetAlso for T {}
