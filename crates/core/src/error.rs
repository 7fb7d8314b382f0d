//! Conversion of domain errors into the application error.

use kassenwart_shared::AppError;

use crate::allocation::AllocationError;
use crate::amount::AmountError;
use crate::budget::BudgetError;
use crate::cash_advance::CashAdvanceError;
use crate::earmark::EarmarkError;
use crate::voucher::VoucherError;

macro_rules! impl_into_app_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for AppError {
                fn from(err: $ty) -> Self {
                    Self::from_kind(err.kind(), err.error_code(), err.to_string())
                }
            }
        )+
    };
}

impl_into_app_error!(
    AmountError,
    AllocationError,
    BudgetError,
    EarmarkError,
    VoucherError,
    CashAdvanceError,
);
