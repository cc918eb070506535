use core::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use core::time::Duration;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ImplicitForm, OpaqueInfo, TypeInfo, Typed};
use crate::{Reflect, ReflectRef};

macro_rules! impl_opaque {
    ($ty:ty $(, $form:expr)?) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    let info = OpaqueInfo::new::<$ty>();
                    $(let info = info.with_implicit_form($form);)?
                    TypeInfo::Opaque(info)
                })
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Opaque
            }

            fn reflect_debug(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Debug::fmt(self, f)
            }
        }
    };
}

// Marshalled by the builtin transforms of the registry.
impl_opaque!(Duration);
impl_opaque!(PathBuf);
impl_opaque!(SystemTime);

impl_opaque!(IpAddr, ImplicitForm::string::<IpAddr>());
impl_opaque!(Ipv4Addr, ImplicitForm::string::<Ipv4Addr>());
impl_opaque!(Ipv6Addr, ImplicitForm::string::<Ipv6Addr>());
impl_opaque!(SocketAddr, ImplicitForm::string::<SocketAddr>());
