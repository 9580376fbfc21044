//! Return and notification-of-change reference tables
//!
//! Both tables are built once on first use and are read-only afterwards, so
//! they can be shared freely across threads.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Return reason codes carried by dishonored-return addenda
pub const DISHONORED_RETURN_CODES: [&str; 7] = ["R61", "R62", "R67", "R68", "R69", "R70", "R77"];

/// Return reason codes carried by contested dishonored-return addenda
pub const CONTESTED_RETURN_CODES: [&str; 6] = ["R71", "R72", "R73", "R74", "R75", "R76"];

pub fn is_dishonored_return_code(code: &str) -> bool {
    DISHONORED_RETURN_CODES.contains(&code)
}

pub fn is_contested_return_code(code: &str) -> bool {
    CONTESTED_RETURN_CODES.contains(&code)
}

/// A return reason code (R01-R85)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnCode {
    pub code: &'static str,
    pub reason: &'static str,
    pub description: &'static str,
}

/// A notification-of-change code (C01-C14, refused C61-C69)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeCode {
    pub code: &'static str,
    pub reason: &'static str,
    pub description: &'static str,
}

#[rustfmt::skip]
const RETURN_CODES: &[(&str, &str, &str)] = &[
    ("R01", "Insufficient Funds", "Available balance is not sufficient to cover the dollar value of the debit entry"),
    ("R02", "Account Closed", "Previously active account has been closed by customer or RDFI"),
    ("R03", "No Account/Unable to Locate Account", "Account number structure is valid and passes editing process, but does not correspond to individual or is not an open account"),
    ("R04", "Invalid Account Number", "Account number structure not valid; entry may fail check digit validation or may contain an incorrect number of digits"),
    ("R05", "Improper Debit to Consumer Account", "A CCD, CTX, or CBR debit entry was transmitted to a Consumer Account of the Receiver and was not authorized by the Receiver"),
    ("R06", "Returned per ODFI's Request", "ODFI has requested RDFI to return the ACH entry"),
    ("R07", "Authorization Revoked by Customer", "Consumer, who previously authorized ACH payment, has revoked authorization from Originator"),
    ("R08", "Payment Stopped", "Receiver of a recurring debit transaction has stopped payment to a specific ACH debit"),
    ("R09", "Uncollected Funds", "Sufficient book or ledger balance exists to satisfy dollar value of the transaction, but the value of transaction is in process of collection"),
    ("R10", "Customer Advises Originator is Not Known to Receiver and/or Originator is Not Authorized by Receiver to Debit Receiver's Account", "Receiver has no relationship with the Originator or has not authorized the Originator to debit the account"),
    ("R11", "Customer Advises Entry Not in Accordance with the Terms of the Authorization", "The Originator and Receiver have a relationship and an authorization exists, but the entry was not in accordance with its terms"),
    ("R12", "Branch Sold to Another DFI", "Financial institution receives entry destined for an account at a branch that has been sold to another financial institution"),
    ("R13", "RDFI not qualified to participate", "Financial institution does not receive commercial ACH entries"),
    ("R14", "Representative payee deceased or unable to continue in that capacity", "The representative payee authorized to accept entries on behalf of a beneficiary is either deceased or unable to continue in that capacity"),
    ("R15", "Beneficiary or bank account holder deceased", "Beneficiary or account holder other than a representative payee is deceased"),
    ("R16", "Bank account frozen", "Funds in bank account are unavailable due to action by RDFI or legal order"),
    ("R17", "File record edit criteria", "Fields rejected by RDFI processing (identified in return addenda)"),
    ("R18", "Improper effective entry date", "Entries have been presented prior to the first available processing window for the effective date"),
    ("R19", "Amount field error", "Improper formatting of the amount field"),
    ("R20", "Non-payment bank account", "Entry destined for non-payment bank account defined by regulation"),
    ("R21", "Invalid company Identification", "The company ID information not valid (normally CIE entries)"),
    ("R22", "Invalid individual ID number", "Individual id used by receiver is incorrect (CIE entries)"),
    ("R23", "Credit entry refused by receiver", "Receiver returned entry because minimum or exact amount not remitted, bank account is subject to litigation, or payment represents an overpayment"),
    ("R24", "Duplicate entry", "RDFI has received a duplicate entry"),
    ("R25", "Addenda error", "Improper formatting of the addenda record information"),
    ("R26", "Mandatory field error", "Improper information in one of the mandatory fields"),
    ("R27", "Trace number error", "Original entry trace number is not valid for return entry; or addenda trace numbers do not correspond with entry detail record"),
    ("R28", "Transit routing number check digit error", "Check digit for the transit routing number is incorrect"),
    ("R29", "Corporate customer advises not authorized", "RDFI has been notified by corporate receiver that debit entry of originator is not authorized"),
    ("R30", "RDFI not participant in check truncation program", "Financial institution not participating in automated check safekeeping application"),
    ("R31", "Permissible return entry (CCD and CTX only)", "RDFI has been notified by the ODFI that it agrees to accept a CCD or CTX return entry"),
    ("R32", "RDFI non-settlement", "RDFI is not able to settle the entry"),
    ("R33", "Return of XCK entry", "RDFI determines at its sole discretion to return an XCK entry"),
    ("R34", "Limited participation RDFI", "RDFI participation has been limited by a federal or state supervisor"),
    ("R35", "Return of improper debit entry", "ACH debit not permitted for use with the CIE standard entry class code (except for reversals)"),
    ("R36", "Return of Improper Credit Entry", "ACH credit entries are not permitted for use with ARC, BOC, POP, RCK, TEL, XCK"),
    ("R37", "Source Document Presented for Payment", "The source document to which an ARC, BOC or POP entry relates has been presented for payment"),
    ("R38", "Stop Payment on Source Document", "The RDFI determines a stop payment order has been placed on the source document"),
    ("R39", "Improper Source Document", "The RDFI determines the source document used for an ARC, BOC or POP entry is not an eligible item"),
    ("R40", "Return of ENR Entry by Federal Government Agency", "This return reason code may only be used to return ENR entries"),
    ("R41", "Invalid Transaction Code", "The transaction code is not valid for an ENR entry"),
    ("R42", "Routing Number/Check Digit Error", "The routing number or check digit in the ENR entry is not valid"),
    ("R43", "Invalid DFI Account Number", "The receiver's account number in the ENR entry is not valid"),
    ("R44", "Invalid Individual ID Number/Identification", "The individual ID number in the ENR entry is not valid"),
    ("R45", "Invalid Individual Name/Company Name", "The name in the ENR entry is not valid"),
    ("R46", "Invalid Representative Payee Indicator", "The representative payee indicator in the ENR entry is not valid"),
    ("R47", "Duplicate Enrollment", "The ENR entry is a duplicate"),
    ("R50", "State Law Affecting RCK Acceptance", "The RDFI is located in a state that has not adopted Revised Article 4 of the UCC"),
    ("R51", "Item related to RCK Entry is Ineligible or RCK Entry is Improper", "An RCK entry is ineligible or improper"),
    ("R52", "Stop Payment on Item related to RCK Entry", "A stop payment order has been placed on the item to which the RCK entry relates"),
    ("R53", "Item and RCK Entry Presented for Payment", "Both the RCK entry and the item were presented for payment"),
    ("R61", "Misrouted Return", "The financial institution preparing the return entry placed the incorrect routing number in the receiving DFI identification field"),
    ("R62", "Return of Erroneous or Reversing Debit", "The originator's or ODFI's use of the reversal process resulted in an erroneous debit"),
    ("R67", "Duplicate Return", "The ODFI has received more than one return for the same entry"),
    ("R68", "Untimely Return", "The return entry has not been sent within the time frame established by the rules"),
    ("R69", "Field Error(s)", "One or more of the field requirements are incorrect"),
    ("R70", "Permissible Return Entry Not Accepted/Return Not Requested by ODFI", "The ODFI has received a return entry identified by the RDFI as being returned with the permission of, or at the request of, the ODFI, but the ODFI has not agreed to accept the entry or has not requested the return"),
    ("R71", "Misrouted Dishonored Return", "The financial institution preparing the dishonored return entry placed the incorrect routing number in the receiving DFI identification field"),
    ("R72", "Untimely Dishonored Return", "The dishonored return entry has not been sent within the designated time frame"),
    ("R73", "Timely Original Return", "The RDFI is certifying that the original return entry was sent within the time frame designated in the rules"),
    ("R74", "Corrected Return", "The RDFI is correcting a previous return entry that was dishonored using return reason code R69"),
    ("R75", "Return Not a Duplicate", "The return entry was not a duplicate of an entry previously returned by the RDFI"),
    ("R76", "No Errors Found", "The original return entry did not contain the errors indicated by the ODFI in the dishonored return entry"),
    ("R77", "Non-Acceptance of R62 Dishonored Return", "The RDFI returned both the erroneous entry and the related reversing entry, or the funds relating to the R62 dishonored return are not recoverable from the Receiver"),
    ("R80", "IAT Entry Coding Error", "The IAT entry is being returned due to one or more of the following conditions: invalid DFI/bank branch country code, invalid DFI/bank identification number qualifier, invalid foreign exchange indicator, invalid ISO originating currency code, invalid ISO destination currency code, invalid ISO destination country code, invalid transaction type code"),
    ("R81", "Non-Participant in IAT Program", "The IAT entry is being returned because the gateway does not have an agreement with either the ODFI or the gateway's customer to transmit IAT entries"),
    ("R82", "Invalid Foreign Receiving DFI Identification", "The reference used to identify the foreign receiving DFI of an outbound IAT entry is invalid"),
    ("R83", "Foreign Receiving DFI Unable to Settle", "The IAT entry is being returned due to settlement problems in the foreign payment system"),
    ("R84", "Entry Not Processed by Gateway", "For outbound IAT entries, the entry has not been processed and is being returned at the gateway's discretion"),
    ("R85", "Incorrectly Coded Outbound International Payment", "The RDFI/gateway has identified the entry as an outbound international payment and is returning the entry because it bears an SEC code that lacks information required by the gateway for OFAC compliance"),
];

#[rustfmt::skip]
const CHANGE_CODES: &[(&str, &str, &str)] = &[
    ("C01", "Incorrect bank account number", "Bank account number incorrect or formatted incorrectly"),
    ("C02", "Incorrect transit/routing number", "Once valid transit/routing number must be changed"),
    ("C03", "Incorrect transit/routing number and bank account number", "Once valid transit/routing number must be changed and causes a change to bank account number structure"),
    ("C04", "Bank account name change", "Customer has changed name or ODFI submitted name incorrectly"),
    ("C05", "Incorrect payment code", "Entry posted to demand account should contain savings payment codes or vice versa"),
    ("C06", "Incorrect bank account number and transit code", "Bank account number must be changed and payment code should indicate posting to another account type (demand/savings)"),
    ("C07", "Incorrect transit/routing number, bank account number and payment code", "Changes required in three fields indicated"),
    ("C08", "Incorrect receiving DFI identification (IAT only)", "Receiving DFI identification is incorrect"),
    ("C09", "Incorrect individual ID number", "Individual's ID number is incorrect"),
    ("C10", "Incorrect company name", "Company name is no longer valid and should be changed"),
    ("C11", "Incorrect company identification", "Company ID is no longer valid and should be changed"),
    ("C12", "Incorrect company name and company ID", "Both the company name and company id are no longer valid and must be changed"),
    ("C13", "Addenda format error", "Information in the entry detail record was correct and the entry was processed and credited to the receiver's account. However, information found in the addenda record was unclear or was formatted incorrectly"),
    ("C14", "Incorrect SEC code for outbound international payment", "The entry was identified as an outbound international payment and should have used the IAT SEC code"),
    ("C61", "Misrouted Notification of Change", "The notification of change was sent to the wrong financial institution"),
    ("C62", "Incorrect Trace Number", "The trace number of the notification of change is incorrect"),
    ("C63", "Incorrect Company Identification Number", "The company identification of the notification of change is incorrect"),
    ("C64", "Incorrect Individual Identification Number/Identification Number", "The individual identification of the notification of change is incorrect"),
    ("C65", "Incorrectly Formatted Corrected Data", "The corrected data is not formatted as required by the change code"),
    ("C66", "Incorrect Discretionary Data", "The discretionary data of the notification of change is incorrect"),
    ("C67", "Routing Number Not From Original Entry Detail Record", "The routing number does not match the original entry"),
    ("C68", "DFI Account Number Not From Original Entry Detail Record", "The account number does not match the original entry"),
    ("C69", "Incorrect Transaction Code", "The transaction code of the notification of change is incorrect"),
];

static RETURN_CODE_TABLE: Lazy<HashMap<&'static str, ReturnCode>> = Lazy::new(|| {
    RETURN_CODES
        .iter()
        .map(|&(code, reason, description)| {
            (
                code,
                ReturnCode {
                    code,
                    reason,
                    description,
                },
            )
        })
        .collect()
});

static CHANGE_CODE_TABLE: Lazy<HashMap<&'static str, ChangeCode>> = Lazy::new(|| {
    CHANGE_CODES
        .iter()
        .map(|&(code, reason, description)| {
            (
                code,
                ChangeCode {
                    code,
                    reason,
                    description,
                },
            )
        })
        .collect()
});

/// Look up a return reason code
pub fn return_code(code: &str) -> Option<&'static ReturnCode> {
    RETURN_CODE_TABLE.get(code)
}

/// Look up a notification-of-change code
pub fn change_code(code: &str) -> Option<&'static ChangeCode> {
    CHANGE_CODE_TABLE.get(code)
}
