use alloc::boxed::Box;
use std::sync::{PoisonError, RwLock};

use mopack_utils::TypeIdMap;
use mopack_wire::{Reader, Writer};

use crate::formatter::{AnyPack, Decode, DecodeError, Encode, EncodeError, Formatter};
use crate::info::{Described, TypeDescriptor};
use crate::resolve::strategy::ResolveStrategy;
use crate::resolve::{ResolveError, ResolverBuilder};

// -----------------------------------------------------------------------------
// Resolver

/// Maps types to their formatters.
///
/// A resolver owns an ordered strategy chain and a cache in front of it.
/// The first lookup for a type walks the chain; every later lookup is a
/// single map probe. The chain is fixed at
/// [`build`](ResolverBuilder::build) time, so cached answers can never go
/// stale.
///
/// Concurrent first lookups of one type may race through the chain; each
/// arrives at the same formatter instance and the last cache insert wins,
/// so the race is benign.
pub struct Resolver {
    chain: Box<[Box<dyn ResolveStrategy>]>,
    cache: RwLock<TypeIdMap<&'static Formatter>>,
}

impl Resolver {
    /// A resolver with the standard strategy chain, with every
    /// auto-registered type already seeded when the `auto_register` feature
    /// is on.
    pub fn standard() -> Resolver {
        let mut builder = ResolverBuilder::standard();
        crate::cfg::auto_register! {
            builder.auto_register();
        }
        builder.build()
    }

    /// An empty [`ResolverBuilder`].
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub(crate) fn from_parts(
        chain: Box<[Box<dyn ResolveStrategy>]>,
        cache: TypeIdMap<&'static Formatter>,
    ) -> Resolver {
        Resolver {
            chain,
            cache: RwLock::new(cache),
        }
    }

    /// Resolves the formatter for `T`.
    pub fn formatter_of<T: Described>(&self) -> Result<&'static Formatter, ResolveError> {
        self.formatter(T::descriptor())
    }

    /// Resolves the formatter for a descriptor.
    ///
    /// Repeated resolution of the same type returns the same instance.
    pub fn formatter(
        &self,
        descriptor: &'static TypeDescriptor,
    ) -> Result<&'static Formatter, ResolveError> {
        let type_id = descriptor.ty().id();

        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        if let Some(formatter) = cached {
            return Ok(formatter);
        }

        for strategy in &self.chain {
            if let Some(formatter) = strategy.resolve(descriptor) {
                self.cache
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(type_id, formatter);
                return Ok(formatter);
            }
        }
        Err(ResolveError {
            type_name: descriptor.name(),
        })
    }

    /// Encodes one value through its resolved formatter.
    ///
    /// Composite codecs call this for their inner values; it is what makes
    /// overrides reach every level of a value tree.
    pub fn encode_value<T: Encode>(
        &self,
        value: &T,
        writer: &mut Writer<'_>,
    ) -> Result<(), EncodeError> {
        crate::cfg::debug! {
            crate::formatter::stack::DESCRIPTOR_STACK
                .with_borrow_mut(|stack| stack.push(T::descriptor()));
        }
        let result = self.encode_value_inner(value, writer);
        crate::cfg::debug! {
            crate::formatter::stack::DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.pop());
        }
        result
    }

    fn encode_value_inner<T: Encode>(
        &self,
        value: &T,
        writer: &mut Writer<'_>,
    ) -> Result<(), EncodeError> {
        let formatter = self.formatter_of::<T>()?;
        match formatter.typed::<T>() {
            Some(vtable) => (vtable.encode)(value, writer, self),
            // An interpreting override has no typed table; the type's own
            // codec is the closest answer for a statically typed caller.
            None => T::encode(value, writer, self),
        }
    }

    /// Decodes one value through its resolved formatter.
    pub fn decode_value<T: Decode>(&self, reader: &mut Reader<'_>) -> Result<T, DecodeError> {
        crate::cfg::debug! {
            crate::formatter::stack::DESCRIPTOR_STACK
                .with_borrow_mut(|stack| stack.push(T::descriptor()));
        }
        let result = self.decode_value_inner(reader);
        crate::cfg::debug! {
            crate::formatter::stack::DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.pop());
        }
        result
    }

    fn decode_value_inner<T: Decode>(&self, reader: &mut Reader<'_>) -> Result<T, DecodeError> {
        let formatter = self.formatter_of::<T>()?;
        match formatter.typed::<T>() {
            Some(vtable) => (vtable.decode)(reader, self),
            None => T::decode(reader, self),
        }
    }

    /// Encodes an erased value through its resolved formatter.
    pub fn encode_erased(
        &self,
        value: &dyn AnyPack,
        writer: &mut Writer<'_>,
    ) -> Result<(), EncodeError> {
        crate::cfg::debug! {
            crate::formatter::stack::DESCRIPTOR_STACK
                .with_borrow_mut(|stack| stack.push(value.descriptor()));
        }
        let result = self
            .formatter(value.descriptor())
            .map_err(EncodeError::from)
            .and_then(|formatter| formatter.encode(value, writer, self));
        crate::cfg::debug! {
            crate::formatter::stack::DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.pop());
        }
        result
    }

    /// Decodes an erased value of the descriptor's type.
    pub fn decode_erased(
        &self,
        descriptor: &'static TypeDescriptor,
        reader: &mut Reader<'_>,
    ) -> Result<Box<dyn AnyPack>, DecodeError> {
        crate::cfg::debug! {
            crate::formatter::stack::DESCRIPTOR_STACK
                .with_borrow_mut(|stack| stack.push(descriptor));
        }
        let result = self
            .formatter(descriptor)
            .map_err(DecodeError::from)
            .and_then(|formatter| formatter.decode(reader, self));
        crate::cfg::debug! {
            crate::formatter::stack::DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.pop());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::resolve::strategy::ScalarStrategy;

    struct CountingScalars {
        hits: &'static AtomicUsize,
    }

    impl ResolveStrategy for CountingScalars {
        fn resolve(&self, descriptor: &'static TypeDescriptor) -> Option<&'static Formatter> {
            self.hits.fetch_add(1, Ordering::Relaxed);
            ScalarStrategy.resolve(descriptor)
        }
    }

    #[test]
    fn the_cache_answers_after_the_first_walk() {
        static HITS: AtomicUsize = AtomicUsize::new(0);

        let mut builder = Resolver::builder();
        builder.push_strategy(CountingScalars { hits: &HITS });
        let resolver = builder.build();

        let first = resolver.formatter_of::<u32>().unwrap();
        let second = resolver.formatter_of::<u32>().unwrap();

        assert!(core::ptr::eq(first, second));
        assert_eq!(HITS.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn unknown_types_report_their_name() {
        let resolver = Resolver::builder().build();
        let error = resolver.formatter_of::<u32>().unwrap_err();
        assert_eq!(error, ResolveError { type_name: "u32" });
    }

    #[test]
    fn resolvers_are_independent_caches() {
        let a = Resolver::standard();
        let b = Resolver::standard();

        // Both land on the same canonical formatter even so.
        let fa = a.formatter_of::<u32>().unwrap();
        let fb = b.formatter_of::<u32>().unwrap();
        assert!(core::ptr::eq(fa, fb));
    }
}
