use alloc::collections::{BTreeSet, VecDeque};
use core::hash::{BuildHasher, Hash};
use std::collections::HashSet;

use crate::impls::GenericTypeInfoCell;
use crate::info::{ArrayInfo, ListInfo, TypeInfo, Typed};
use crate::{List, Reflect, ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Growable lists

macro_rules! impl_list {
    ($ty:ident < T $(, $s:ident)? > where $($bound:path),* ; $push:ident) => {
        impl<T $(, $s)?> List for $ty<T $(, $s)?>
        where
            T: Reflect + Typed $(+ $bound)*,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            #[inline]
            fn len(&self) -> usize {
                <$ty<T $(, $s)?>>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                // `Vec` only iterates through its slice, go through `&Self` for all four.
                Box::new(<&$ty<T $(, $s)?> as IntoIterator>::into_iter(self).map(|item| item as &dyn Reflect))
            }

            fn push(&mut self, item: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                let item = item.take::<T>()?;
                self.$push(item);
                Ok(())
            }
        }

        impl<T $(, $s)?> Typed for $ty<T $(, $s)?>
        where
            T: Reflect + Typed $(+ $bound)*,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::List(ListInfo::new::<Self, T>(|| Box::new(<$ty<T $(, $s)?>>::default())))
                })
            }
        }

        impl<T $(, $s)?> Reflect for $ty<T $(, $s)?>
        where
            T: Reflect + Typed $(+ $bound)*,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::List(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::List(self)
            }
        }
    };
}

impl_list!(Vec<T> where ; push);
impl_list!(VecDeque<T> where ; push_back);
impl_list!(BTreeSet<T> where Ord ; insert_item);
impl_list!(HashSet<T, S> where Eq, Hash ; insert_item);

// Sets report duplicates through `insert`'s return value, which is ignored.
trait InsertItem<T> {
    fn insert_item(&mut self, item: T);
}

impl<T: Ord> InsertItem<T> for BTreeSet<T> {
    #[inline]
    fn insert_item(&mut self, item: T) {
        self.insert(item);
    }
}

impl<T: Eq + Hash, S: BuildHasher> InsertItem<T> for HashSet<T, S> {
    #[inline]
    fn insert_item(&mut self, item: T) {
        self.insert(item);
    }
}

// -----------------------------------------------------------------------------
// Arrays

fn array_from_items<T: Reflect + Typed, const N: usize>(items: Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>> {
    let items = items
        .into_iter()
        .map(|item| item.take::<T>().ok())
        .collect::<Option<Vec<T>>>()?;
    let array: [T; N] = items.try_into().ok()?;
    Some(Box::new(array))
}

impl<T: Reflect + Typed, const N: usize> List for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(self.as_slice().iter().map(|item| item as &dyn Reflect))
    }

    #[inline]
    fn push(&mut self, item: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Err(item)
    }
}

impl<T: Reflect + Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self, T>(N, array_from_items::<T, N>)))
    }
}

impl<T: Reflect + Typed, const N: usize> Reflect for [T; N] {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::info::Typed;
    use crate::{Reflect, ReflectMut, ReflectRef};
    use alloc::collections::{BTreeSet, VecDeque};

    fn items_of(value: &dyn Reflect) -> Vec<u8> {
        let ReflectRef::List(items) = value.reflect_ref() else {
            panic!("expected a list");
        };
        items.iter().map(|item| *item.downcast_ref::<u8>().unwrap()).collect()
    }

    #[test]
    fn growable_lists_iterate_in_order() {
        assert_eq!(items_of(&vec![4_u8, 5, 6]), [4, 5, 6]);
        assert_eq!(items_of(&Vec::<u8>::new()), [] as [u8; 0]);
        assert_eq!(items_of(&VecDeque::from([7_u8, 8])), [7, 8]);
    }

    #[test]
    fn list_push_checks_item_type() {
        let mut list = <Vec<u8>>::type_info().constructor().unwrap()();
        let ReflectMut::List(items) = (*list).reflect_mut() else {
            panic!("expected a list");
        };
        assert!(items.push(Box::new(1_u8)).is_ok());
        assert!(items.push(Box::new(1_i8)).is_err());
        assert_eq!(items.len(), 1);
        assert_eq!(list.take::<Vec<u8>>().unwrap(), [1]);
    }

    #[test]
    fn sets_iterate_in_order() {
        assert_eq!(items_of(&BTreeSet::from([3_u8, 1, 2])), [1, 2, 3]);
    }

    #[test]
    fn arrays_need_the_exact_length() {
        let info = <[u16; 2]>::type_info().as_array().unwrap();
        assert_eq!(info.capacity(), 2);
        assert!(info.from_items(vec![Box::new(1_u16) as Box<dyn Reflect>]).is_none());
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(1_u16), Box::new(2_u16)];
        let array = info.from_items(items).unwrap();
        assert_eq!(array.take::<[u16; 2]>().unwrap(), [1, 2]);
    }
}
