//! Item templates: shared, read-only descriptions keyed by `ObjKind`.
//!
//! This is the compact catalog the engine rules run against. Instances
//! (`Object`) reference a kind and carry all mutable state.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Broad item class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ObjClass {
    Weapon,
    Armor,
    Ring,
    Tool,
    Food,
    Potion,
    Scroll,
    Spellbook,
    Wand,
    Coin,
    Gem,
    Rock,
    Ball,
    Chain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Liquid,
    Wax,
    Paper,
    Cloth,
    Leather,
    Wood,
    Bone,
    Iron,
    Metal,
    Silver,
    Gold,
    Glass,
    Gemstone,
    Mineral,
    Flesh,
}

/// Weapon-class proficiency groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Skill {
    None,
    Dagger,
    Knife,
    Spear,
    Javelin,
    Club,
    Mace,
    Hammer,
    Quarterstaff,
    Bow,
    Sling,
    Crossbow,
    Dart,
    Shuriken,
    Boomerang,
    PickAxe,
}

/// Which launcher an ammunition kind pairs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LauncherKind {
    Bow,
    Sling,
    Crossbow,
}

/// Body slot a piece of armor occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorSlot {
    Body,
    Helmet,
    Shield,
    Gloves,
    Cloak,
}

/// Potions, by effect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PotionKind {
    Healing,
    ExtraHealing,
    FullHealing,
    GainLevel,
    GainEnergy,
    GainAbility,
    RestoreAbility,
    Confusion,
    Blindness,
    Paralysis,
    Sleeping,
    Hallucination,
    Speed,
    Levitation,
    Invisibility,
    SeeInvisible,
    ObjectDetection,
    MonsterDetection,
    Acid,
    Sickness,
    FruitJuice,
    Booze,
    Water,
}

impl PotionKind {
    pub fn name(self) -> &'static str {
        match self {
            PotionKind::Healing => "healing",
            PotionKind::ExtraHealing => "extra healing",
            PotionKind::FullHealing => "full healing",
            PotionKind::GainLevel => "gain level",
            PotionKind::GainEnergy => "gain energy",
            PotionKind::GainAbility => "gain ability",
            PotionKind::RestoreAbility => "restore ability",
            PotionKind::Confusion => "confusion",
            PotionKind::Blindness => "blindness",
            PotionKind::Paralysis => "paralysis",
            PotionKind::Sleeping => "sleeping",
            PotionKind::Hallucination => "hallucination",
            PotionKind::Speed => "speed",
            PotionKind::Levitation => "levitation",
            PotionKind::Invisibility => "invisibility",
            PotionKind::SeeInvisible => "see invisible",
            PotionKind::ObjectDetection => "object detection",
            PotionKind::MonsterDetection => "monster detection",
            PotionKind::Acid => "acid",
            PotionKind::Sickness => "sickness",
            PotionKind::FruitJuice => "fruit juice",
            PotionKind::Booze => "booze",
            PotionKind::Water => "water",
        }
    }
}

/// Scrolls, by effect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ScrollKind {
    EnchantArmor,
    DestroyArmor,
    EnchantWeapon,
    RemoveCurse,
    Identify,
    Teleportation,
    GoldDetection,
    FoodDetection,
    Light,
    Fire,
    Earth,
    CreateMonster,
    Taming,
    ScareMonster,
    ConfuseMonster,
    MagicMapping,
    Genocide,
    Punishment,
    Charging,
}

impl ScrollKind {
    pub fn name(self) -> &'static str {
        match self {
            ScrollKind::EnchantArmor => "enchant armor",
            ScrollKind::DestroyArmor => "destroy armor",
            ScrollKind::EnchantWeapon => "enchant weapon",
            ScrollKind::RemoveCurse => "remove curse",
            ScrollKind::Identify => "identify",
            ScrollKind::Teleportation => "teleportation",
            ScrollKind::GoldDetection => "gold detection",
            ScrollKind::FoodDetection => "food detection",
            ScrollKind::Light => "light",
            ScrollKind::Fire => "fire",
            ScrollKind::Earth => "earth",
            ScrollKind::CreateMonster => "create monster",
            ScrollKind::Taming => "taming",
            ScrollKind::ScareMonster => "scare monster",
            ScrollKind::ConfuseMonster => "confuse monster",
            ScrollKind::MagicMapping => "magic mapping",
            ScrollKind::Genocide => "genocide",
            ScrollKind::Punishment => "punishment",
            ScrollKind::Charging => "charging",
        }
    }
}

/// Every item kind the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjKind {
    // ammunition
    Arrow,
    ElvenArrow,
    OrcishArrow,
    Ya,
    CrossbowBolt,
    // thrown weapons
    Dart,
    Shuriken,
    Boomerang,
    Dagger,
    ElvenDagger,
    OrcishDagger,
    Knife,
    Spear,
    Javelin,
    // hand weapons
    Club,
    Mace,
    WarHammer,
    Quarterstaff,
    // launchers
    Bow,
    ElvenBow,
    OrcishBow,
    Yumi,
    Sling,
    Crossbow,
    // armor
    LeatherArmor,
    PlateMail,
    Helmet,
    SmallShield,
    LeatherGloves,
    GauntletsOfPower,
    ElvenCloak,
    // rings and wands (merchandise; zapping is outside this engine)
    RingOfProtection,
    RingOfSearching,
    WandOfStriking,
    WandOfSleep,
    // tools
    PickAxe,
    SkeletonKey,
    TinWhistle,
    OilLamp,
    Sack,
    LargeBox,
    Chest,
    WaxCandle,
    TallowCandle,
    // food
    FoodRation,
    Apple,
    RoyalJelly,
    Corpse,
    // stones
    Diamond,
    Ruby,
    WorthlessGlass,
    FlintStone,
    Rock,
    Boulder,
    Statue,
    // chains and spheres
    HeavyIronBall,
    IronChain,
    Gold,
    Spellbook,
    Potion(PotionKind),
    Scroll(ScrollKind),
}

/// Read-only description of one item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjTemplate {
    pub name: &'static str,
    pub class: ObjClass,
    pub material: Material,
    pub weight: u16,
    /// Damage dice against small targets.
    pub sdam: (u8, u8),
    /// Damage dice against large targets.
    pub ldam: (u8, u8),
    pub skill: Skill,
    pub ammo_for: Option<LauncherKind>,
    pub launches: Option<LauncherKind>,
    pub thrown_weapon: bool,
    pub slot: Option<ArmorSlot>,
    /// AC points granted while worn.
    pub ac: u8,
    pub price: u16,
}

/// Every call site assigns `class` afterwards; Tool is only a starting
/// value.
const fn base(name: &'static str, material: Material, weight: u16) -> ObjTemplate {
    ObjTemplate {
        name,
        class: ObjClass::Tool,
        material,
        weight,
        sdam: (0, 0),
        ldam: (0, 0),
        skill: Skill::None,
        ammo_for: None,
        launches: None,
        thrown_weapon: false,
        slot: None,
        ac: 0,
        price: 0,
    }
}

const fn weapon(
    name: &'static str,
    material: Material,
    weight: u16,
    sdam: (u8, u8),
    ldam: (u8, u8),
    skill: Skill,
    price: u16,
) -> ObjTemplate {
    let mut t = base(name, material, weight);
    t.class = ObjClass::Weapon;
    t.sdam = sdam;
    t.ldam = ldam;
    t.skill = skill;
    t.price = price;
    t
}

const fn ammo(
    name: &'static str,
    material: Material,
    weight: u16,
    sdam: (u8, u8),
    ldam: (u8, u8),
    skill: Skill,
    launcher: LauncherKind,
    price: u16,
) -> ObjTemplate {
    let mut t = weapon(name, material, weight, sdam, ldam, skill, price);
    t.ammo_for = Some(launcher);
    t
}

const fn thrown(
    name: &'static str,
    material: Material,
    weight: u16,
    sdam: (u8, u8),
    ldam: (u8, u8),
    skill: Skill,
    price: u16,
) -> ObjTemplate {
    let mut t = weapon(name, material, weight, sdam, ldam, skill, price);
    t.thrown_weapon = true;
    t
}

const fn launcher(
    name: &'static str,
    material: Material,
    weight: u16,
    skill: Skill,
    kind: LauncherKind,
    price: u16,
) -> ObjTemplate {
    let mut t = weapon(name, material, weight, (1, 2), (1, 2), skill, price);
    t.launches = Some(kind);
    t
}

const fn armor(
    name: &'static str,
    material: Material,
    weight: u16,
    slot: ArmorSlot,
    ac: u8,
    price: u16,
) -> ObjTemplate {
    let mut t = base(name, material, weight);
    t.class = ObjClass::Armor;
    t.slot = Some(slot);
    t.ac = ac;
    t.price = price;
    t
}

impl ObjKind {
    pub fn template(self) -> ObjTemplate {
        match self {
            ObjKind::Arrow => {
                ammo("arrow", Material::Iron, 1, (1, 6), (1, 6), Skill::Bow, LauncherKind::Bow, 2)
            }
            ObjKind::ElvenArrow => ammo(
                "elven arrow",
                Material::Wood,
                1,
                (1, 7),
                (1, 6),
                Skill::Bow,
                LauncherKind::Bow,
                2,
            ),
            ObjKind::OrcishArrow => ammo(
                "orcish arrow",
                Material::Iron,
                1,
                (1, 5),
                (1, 6),
                Skill::Bow,
                LauncherKind::Bow,
                2,
            ),
            ObjKind::Ya => {
                ammo("ya", Material::Metal, 1, (1, 7), (1, 7), Skill::Bow, LauncherKind::Bow, 4)
            }
            ObjKind::CrossbowBolt => ammo(
                "crossbow bolt",
                Material::Iron,
                1,
                (1, 4),
                (1, 6),
                Skill::Crossbow,
                LauncherKind::Crossbow,
                2,
            ),
            ObjKind::Dart => {
                thrown("dart", Material::Iron, 1, (1, 3), (1, 2), Skill::Dart, 2)
            }
            ObjKind::Shuriken => {
                thrown("shuriken", Material::Iron, 1, (1, 8), (1, 6), Skill::Shuriken, 5)
            }
            ObjKind::Boomerang => {
                thrown("boomerang", Material::Wood, 5, (1, 9), (1, 9), Skill::Boomerang, 20)
            }
            ObjKind::Dagger => {
                thrown("dagger", Material::Iron, 10, (1, 4), (1, 3), Skill::Dagger, 4)
            }
            ObjKind::ElvenDagger => {
                thrown("elven dagger", Material::Wood, 10, (1, 5), (1, 3), Skill::Dagger, 4)
            }
            ObjKind::OrcishDagger => {
                thrown("orcish dagger", Material::Iron, 10, (1, 3), (1, 3), Skill::Dagger, 4)
            }
            ObjKind::Knife => {
                thrown("knife", Material::Iron, 5, (1, 3), (1, 2), Skill::Knife, 4)
            }
            ObjKind::Spear => {
                thrown("spear", Material::Iron, 30, (1, 6), (1, 8), Skill::Spear, 3)
            }
            ObjKind::Javelin => {
                thrown("javelin", Material::Iron, 20, (1, 6), (1, 6), Skill::Javelin, 3)
            }
            ObjKind::Club => weapon("club", Material::Wood, 30, (1, 6), (1, 3), Skill::Club, 3),
            ObjKind::Mace => weapon("mace", Material::Iron, 30, (1, 6), (1, 6), Skill::Mace, 5),
            ObjKind::WarHammer => {
                weapon("war hammer", Material::Iron, 50, (1, 4), (1, 4), Skill::Hammer, 5)
            }
            ObjKind::Quarterstaff => {
                weapon("quarterstaff", Material::Wood, 40, (1, 6), (1, 6), Skill::Quarterstaff, 5)
            }
            ObjKind::Bow => {
                launcher("bow", Material::Wood, 30, Skill::Bow, LauncherKind::Bow, 60)
            }
            ObjKind::ElvenBow => {
                launcher("elven bow", Material::Wood, 30, Skill::Bow, LauncherKind::Bow, 60)
            }
            ObjKind::OrcishBow => {
                launcher("orcish bow", Material::Wood, 30, Skill::Bow, LauncherKind::Bow, 60)
            }
            ObjKind::Yumi => {
                launcher("yumi", Material::Wood, 30, Skill::Bow, LauncherKind::Bow, 60)
            }
            ObjKind::Sling => {
                launcher("sling", Material::Leather, 3, Skill::Sling, LauncherKind::Sling, 20)
            }
            ObjKind::Crossbow => {
                launcher("crossbow", Material::Wood, 50, Skill::Crossbow, LauncherKind::Crossbow, 40)
            }
            ObjKind::LeatherArmor => {
                armor("leather armor", Material::Leather, 150, ArmorSlot::Body, 2, 5)
            }
            ObjKind::PlateMail => {
                armor("plate mail", Material::Iron, 450, ArmorSlot::Body, 7, 600)
            }
            ObjKind::Helmet => armor("helmet", Material::Iron, 30, ArmorSlot::Helmet, 1, 10),
            ObjKind::SmallShield => {
                armor("small shield", Material::Wood, 30, ArmorSlot::Shield, 1, 3)
            }
            ObjKind::LeatherGloves => {
                armor("leather gloves", Material::Leather, 10, ArmorSlot::Gloves, 1, 8)
            }
            ObjKind::GauntletsOfPower => {
                armor("gauntlets of power", Material::Iron, 30, ArmorSlot::Gloves, 1, 50)
            }
            ObjKind::ElvenCloak => {
                armor("elven cloak", Material::Cloth, 10, ArmorSlot::Cloak, 1, 60)
            }
            ObjKind::RingOfProtection => {
                let mut t = base("ring of protection", Material::Iron, 3);
                t.class = ObjClass::Ring;
                t.price = 100;
                t
            }
            ObjKind::RingOfSearching => {
                let mut t = base("ring of searching", Material::Iron, 3);
                t.class = ObjClass::Ring;
                t.price = 200;
                t
            }
            ObjKind::WandOfStriking => {
                let mut t = base("wand of striking", Material::Iron, 7);
                t.class = ObjClass::Wand;
                t.price = 150;
                t
            }
            ObjKind::WandOfSleep => {
                let mut t = base("wand of sleep", Material::Iron, 7);
                t.class = ObjClass::Wand;
                t.price = 175;
                t
            }
            ObjKind::PickAxe => {
                let mut t =
                    weapon("pick-axe", Material::Iron, 100, (1, 6), (1, 3), Skill::PickAxe, 50);
                t.class = ObjClass::Tool;
                t
            }
            ObjKind::SkeletonKey => {
                let mut t = base("skeleton key", Material::Iron, 3);
                t.class = ObjClass::Tool;
                t.price = 10;
                t
            }
            ObjKind::TinWhistle => {
                let mut t = base("tin whistle", Material::Metal, 3);
                t.class = ObjClass::Tool;
                t.price = 10;
                t
            }
            ObjKind::OilLamp => {
                let mut t = base("oil lamp", Material::Iron, 20);
                t.class = ObjClass::Tool;
                t.price = 10;
                t
            }
            ObjKind::Sack => {
                let mut t = base("sack", Material::Cloth, 15);
                t.class = ObjClass::Tool;
                t.price = 2;
                t
            }
            ObjKind::LargeBox => {
                let mut t = base("large box", Material::Wood, 350);
                t.class = ObjClass::Tool;
                t.price = 8;
                t
            }
            ObjKind::Chest => {
                let mut t = base("chest", Material::Wood, 600);
                t.class = ObjClass::Tool;
                t.price = 16;
                t
            }
            ObjKind::WaxCandle => {
                let mut t = base("wax candle", Material::Wax, 2);
                t.class = ObjClass::Tool;
                t.price = 20;
                t
            }
            ObjKind::TallowCandle => {
                let mut t = base("tallow candle", Material::Wax, 2);
                t.class = ObjClass::Tool;
                t.price = 10;
                t
            }
            ObjKind::FoodRation => {
                let mut t = base("food ration", Material::Flesh, 20);
                t.class = ObjClass::Food;
                t.price = 45;
                t
            }
            ObjKind::Apple => {
                let mut t = base("apple", Material::Flesh, 2);
                t.class = ObjClass::Food;
                t.price = 7;
                t
            }
            ObjKind::RoyalJelly => {
                let mut t = base("lump of royal jelly", Material::Flesh, 2);
                t.class = ObjClass::Food;
                t.price = 15;
                t
            }
            ObjKind::Corpse => {
                let mut t = base("corpse", Material::Flesh, 400);
                t.class = ObjClass::Food;
                t.price = 5;
                t
            }
            ObjKind::Diamond => {
                let mut t = base("diamond", Material::Gemstone, 1);
                t.class = ObjClass::Gem;
                t.price = 4000;
                t
            }
            ObjKind::Ruby => {
                let mut t = base("ruby", Material::Gemstone, 1);
                t.class = ObjClass::Gem;
                t.price = 3500;
                t
            }
            ObjKind::WorthlessGlass => {
                let mut t = base("worthless piece of glass", Material::Glass, 1);
                t.class = ObjClass::Gem;
                t.price = 6;
                t
            }
            ObjKind::FlintStone => {
                let mut t = ammo(
                    "flint stone",
                    Material::Mineral,
                    10,
                    (1, 6),
                    (1, 6),
                    Skill::Sling,
                    LauncherKind::Sling,
                    1,
                );
                t.class = ObjClass::Gem;
                t
            }
            ObjKind::Rock => {
                let mut t = ammo(
                    "rock",
                    Material::Mineral,
                    10,
                    (1, 3),
                    (1, 3),
                    Skill::Sling,
                    LauncherKind::Sling,
                    0,
                );
                t.class = ObjClass::Rock;
                t
            }
            ObjKind::Boulder => {
                let mut t = base("boulder", Material::Mineral, 6000);
                t.class = ObjClass::Rock;
                t.sdam = (1, 20);
                t.ldam = (1, 20);
                t
            }
            ObjKind::Statue => {
                let mut t = base("statue", Material::Mineral, 2500);
                t.class = ObjClass::Rock;
                t
            }
            ObjKind::HeavyIronBall => {
                let mut t = base("heavy iron ball", Material::Iron, 480);
                t.class = ObjClass::Ball;
                t.sdam = (1, 25);
                t.ldam = (1, 25);
                t
            }
            ObjKind::IronChain => {
                let mut t = base("iron chain", Material::Iron, 120);
                t.class = ObjClass::Chain;
                t.sdam = (1, 4);
                t.ldam = (1, 4);
                t
            }
            ObjKind::Gold => {
                let mut t = base("gold piece", Material::Gold, 1);
                t.class = ObjClass::Coin;
                t.price = 1;
                t
            }
            ObjKind::Spellbook => {
                let mut t = base("spellbook of force bolt", Material::Paper, 50);
                t.class = ObjClass::Spellbook;
                t.price = 100;
                t
            }
            ObjKind::Potion(_) => {
                let mut t = base("potion", Material::Glass, 20);
                t.class = ObjClass::Potion;
                t.price = 100;
                t
            }
            ObjKind::Scroll(_) => {
                let mut t = base("scroll", Material::Paper, 5);
                t.class = ObjClass::Scroll;
                t.price = 100;
                t
            }
        }
    }

    /// Display name; potions and scrolls expand their effect name.
    pub fn name(self) -> String {
        match self {
            ObjKind::Potion(p) => format!("potion of {}", p.name()),
            ObjKind::Scroll(s) => format!("scroll of {}", s.name()),
            other => other.template().name.to_string(),
        }
    }

    pub fn class(self) -> ObjClass {
        self.template().class
    }

    pub fn is_ammo(self) -> bool {
        self.template().ammo_for.is_some()
    }

    pub fn is_launcher(self) -> bool {
        self.template().launches.is_some()
    }

    /// Ammunition fired by the given launcher object kind.
    pub fn fits_launcher(self, launcher: ObjKind) -> bool {
        match (self.template().ammo_for, launcher.template().launches) {
            (Some(a), Some(l)) => a == l,
            _ => false,
        }
    }

    /// Kinds generated several at a time.
    pub fn is_multigen(self) -> bool {
        matches!(
            self,
            ObjKind::Arrow
                | ObjKind::ElvenArrow
                | ObjKind::OrcishArrow
                | ObjKind::Ya
                | ObjKind::CrossbowBolt
                | ObjKind::Dart
                | ObjKind::Shuriken
                | ObjKind::Rock
                | ObjKind::FlintStone
        )
    }

    pub fn is_potion(self) -> bool {
        matches!(self, ObjKind::Potion(_))
    }

    pub fn potion(self) -> Option<PotionKind> {
        match self {
            ObjKind::Potion(p) => Some(p),
            _ => None,
        }
    }

    pub fn scroll(self) -> Option<ScrollKind> {
        match self {
            ObjKind::Scroll(s) => Some(s),
            _ => None,
        }
    }
}
