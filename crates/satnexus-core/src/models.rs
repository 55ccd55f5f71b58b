pub mod analysis;
pub mod image;
pub mod page;
pub mod user;

pub use analysis::{
    AnalysisDetail, AnalysisFilter, AnalysisId, ChangeAnalysis, ChangeArea, ChangeType, NewAnalysis,
};
pub use image::{Image, ImageDetail, ImageDraft, ImageForm, ImageId};
pub use page::{Page, PageRequest};
pub use user::{Credentials, Registration, Role, User, UserId, UserSummary, ValidRegistration};
