pub mod appearance;
pub mod character;
pub mod credit;
pub mod installment;
pub mod page;
pub mod persona;
pub mod series;
pub mod thread;

pub use appearance::{Appearance, AppearanceKind, AppearanceSeed};
pub use character::{Character, CharacterCreate, CharacterUpdate};
pub use credit::{Creator, CreatorCreate, Credit, CreditCreate, Role, RoleCreate};
pub use installment::{Installment, InstallmentCreate, InstallmentUpdate};
pub use page::{Page, PageCreate};
pub use persona::{
    Classification, ClassificationCreate, Persona, PersonaCreate, PersonaKind, PersonaUpdate,
};
pub use series::{FlipDirection, Series, SeriesCreate, SeriesUpdate};
pub use thread::{Thread, ThreadCreate, ThreadSequence, ThreadSequenceCreate};
