mod stock;
pub use self::stock::{CurrentPriceResponse, MarketStatus, StockData};

mod history;
pub use self::history::PriceHistoryPoint;

mod recommendation;
pub use self::recommendation::Recommendation;
