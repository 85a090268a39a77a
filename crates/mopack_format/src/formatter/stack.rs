crate::cfg::debug! {
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::fmt::{Debug, Formatter};
    use core::slice::Iter;

    use crate::info::TypeDescriptor;

    std::thread_local! {
        pub(crate) static DESCRIPTOR_STACK: RefCell<DescriptorStack> =
            const { RefCell::new(DescriptorStack::new()) };
    }

    /// Helper struct for tracking the descriptor hierarchy while a value tree
    /// is encoded or decoded.
    ///
    /// Only maintained in debug builds with the `debug` feature on; error
    /// messages built through `custom` include its rendering.
    #[derive(Default, Clone)]
    pub(crate) struct DescriptorStack {
        stack: Vec<&'static TypeDescriptor>,
    }

    impl DescriptorStack {
        pub const fn new() -> Self {
            Self { stack: Vec::new() }
        }

        pub fn push(&mut self, descriptor: &'static TypeDescriptor) {
            self.stack.push(descriptor);
        }

        pub fn pop(&mut self) {
            self.stack.pop();
        }

        pub fn clear(&mut self) {
            self.stack.clear();
        }

        /// Iterates the stack in the order the descriptors were entered.
        pub fn iter(&self) -> Iter<'_, &'static TypeDescriptor> {
            self.stack.iter()
        }
    }

    impl Debug for DescriptorStack {
        fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
            let mut iter = self.iter();

            if let Some(first) = iter.next() {
                writeln!(f, "`{}`", first.name())?;
            }

            for descriptor in iter {
                writeln!(f, " -> `{}`", descriptor.name())?;
            }

            Ok(())
        }
    }
}
