use alloc::collections::BTreeMap;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use crate::impls::GenericTypeInfoCell;
use crate::info::{MapInfo, TypeInfo, Typed};
use crate::{Map, Reflect, ReflectMut, ReflectRef};

macro_rules! impl_map {
    ($ty:ident < K, V $(, $s:ident)? > where $($bound:path),+) => {
        impl<K, V $(, $s)?> Map for $ty<K, V $(, $s)?>
        where
            K: Reflect + Typed $(+ $bound)+,
            V: Reflect + Typed,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            #[inline]
            fn len(&self) -> usize {
                <$ty<K, V $(, $s)?>>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(
                    <$ty<K, V $(, $s)?>>::iter(self)
                        .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)),
                )
            }

            fn insert(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)> {
                if !key.is::<K>() || !value.is::<V>() {
                    return Err((key, value));
                }
                match (key.take::<K>(), value.take::<V>()) {
                    (Ok(key), Ok(value)) => {
                        <$ty<K, V $(, $s)?>>::insert(self, key, value);
                        Ok(())
                    }
                    _ => unreachable!("entry types were checked"),
                }
            }
        }

        impl<K, V $(, $s)?> Typed for $ty<K, V $(, $s)?>
        where
            K: Reflect + Typed $(+ $bound)+,
            V: Reflect + Typed,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self, K, V>(|| Box::new(<$ty<K, V $(, $s)?>>::default())))
                })
            }
        }

        impl<K, V $(, $s)?> Reflect for $ty<K, V $(, $s)?>
        where
            K: Reflect + Typed $(+ $bound)+,
            V: Reflect + Typed,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(self)
            }
        }
    };
}

impl_map!(BTreeMap<K, V> where Ord);
impl_map!(HashMap<K, V, S> where Eq, Hash);

#[cfg(test)]
mod tests {
    use crate::info::Typed;
    use crate::ReflectMut;
    use alloc::collections::BTreeMap;
    use alloc::string::String;

    #[test]
    fn insert_hands_back_mismatched_entries() {
        let info = <BTreeMap<String, u8>>::type_info().as_map().unwrap();
        assert!(info.key_info().is::<String>());
        assert!(info.value_info().is::<u8>());

        let mut map = info.constructor()();
        let ReflectMut::Map(entries) = (*map).reflect_mut() else {
            panic!("expected a map");
        };
        assert!(entries.insert(Box::new(String::from("a")), Box::new(1_u8)).is_ok());
        let (key, value) = entries
            .insert(Box::new(String::from("b")), Box::new(1_u16))
            .unwrap_err();
        assert!(key.is::<String>());
        assert!(value.is::<u16>());
        assert_eq!(entries.len(), 1);
        let map = map.take::<BTreeMap<String, u8>>().unwrap();
        assert_eq!(map.get("a"), Some(&1));
    }
}
