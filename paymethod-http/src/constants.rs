//! Routes and default endpoints of the billing API.

use paymethod::Market;

/// Default API endpoint of the EU market.
pub const EU_ENDPOINT: &str = "https://eu.api.ovh.com/1.0/";

/// Default API endpoint of the CA market.
pub const CA_ENDPOINT: &str = "https://ca.api.ovh.com/1.0/";

/// Default API endpoint of the US market.
pub const US_ENDPOINT: &str = "https://api.us.ovhcloud.com/1.0/";

/// Parent route of the payment mean sub-resources.
pub const PAYMENT_MEAN_ROUTE: &str = "me/paymentMean";

/// Route listing the payment mean types available for automatic payment.
pub const AVAILABLE_MEANS_ROUTE: &str = "me/availableAutomaticPaymentMeans";

/// Action making a payment mean the default one.
pub const CHOOSE_AS_DEFAULT_ACTION: &str = "chooseAsDefaultPaymentMean";

/// Action answering the validation challenge of a payment mean.
pub const CHALLENGE_ACTION: &str = "challenge";

/// Query parameter filtering payment mean listings by state.
pub const STATE_PARAM: &str = "state";

/// Status reported when no HTTP response was received.
pub const STATUS_TRANSPORT: u16 = 0;

/// Returns the default endpoint of a market.
#[must_use]
pub const fn default_endpoint(market: Market) -> &'static str {
    match market {
        Market::Eu => EU_ENDPOINT,
        Market::Ca => CA_ENDPOINT,
        Market::Us => US_ENDPOINT,
    }
}
