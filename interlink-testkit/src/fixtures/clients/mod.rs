pub mod headerchain;
pub mod solo;
