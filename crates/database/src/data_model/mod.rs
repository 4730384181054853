use crate::Result;

pub mod zone;

pub trait DatabaseRow: Sized {
    type Model;

    fn to_model(self) -> Result<Self::Model>;
    fn from_model(model: &Self::Model) -> Result<Self>;
}
