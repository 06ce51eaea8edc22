/// 数据库实体定义
pub mod token;
pub mod user;

pub use token::TokenEntity;
pub use user::UserEntity;
