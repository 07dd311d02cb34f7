//! Items: kind catalog, instances, random creation.

mod mkobj;
mod obj;
mod objclass;

pub use mkobj::{blessorcurse, kinds_in, mkgold, mkobj, mksobj};
pub use obj::{Artifact, Buc, ItemProps, ObjLocation, Object, ObjectId, WornMask};
pub use objclass::{
    ArmorSlot, LauncherKind, Material, ObjClass, ObjKind, ObjTemplate, PotionKind, ScrollKind,
    Skill,
};
