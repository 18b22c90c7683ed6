mod registry;

pub use registry::{
    get_locale, NumberLocale, DE_CH, DE_DE, EN_GB, EN_US, ES_ES, ES_MX, FR_CH, FR_FR, IT_CH, IT_IT,
};
