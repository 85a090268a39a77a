/// Serialization lifecycle callbacks.
///
/// `before_encode` runs right before a value starts writing its members;
/// `after_decode` runs on the assembled value right before it is returned.
/// Both default to doing nothing.
///
/// Derived codecs call these directly when the type opts in with
/// `#[pack(hooks)]`; descriptor-interpreting codecs reach them through the
/// descriptor's [`HookTable`](crate::info::HookTable).
pub trait PackHooks {
    fn before_encode(&self) {}

    fn after_decode(&mut self) {}
}
