/// A callable paired with the state it will be called with.
///
/// Built once per dispatch and consumed by [`Invocation::invoke`]; taking
/// `self` by value means it cannot run twice.
#[must_use = "an invocation does nothing until invoked"]
pub struct Invocation<F, S> {
    func: F,
    state: S,
}

impl<F, S> Invocation<F, S> {
    pub fn new(func: F, state: S) -> Self {
        Self { func, state }
    }

    pub fn invoke<T>(self) -> T
    where
        F: FnOnce(S) -> T,
    {
        (self.func)(self.state)
    }
}
