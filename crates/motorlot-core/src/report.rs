//! # Report Module
//!
//! The aggregation pipeline: pure, stateless transforms that fold raw,
//! unordered Sale/Expense ledgers into time-bucketed, ranked summaries.
//!
//! ## Pipeline Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Aggregation Pipeline                                │
//! │                                                                         │
//! │  Sale[] ──┬──► monthly buckets (12, index 0 = January)                 │
//! │           ├──► employee ranking (count desc, stable ties)              │
//! │           └──► top-model ranking (first two name tokens, top 5)        │
//! │                                                                         │
//! │  Expense[] ──┬──► monthly buckets                                       │
//! │              └──► category breakdown (amount desc, % of total)          │
//! │                                                                         │
//! │  No hidden state. Same inputs = byte-identical output.                  │
//! │  No guarantee is made about store delivery order, so every ordering     │
//! │  here is COMPUTED, never assumed from fetch order.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Policy
//! Aggregation never raises. Absent buckets and empty groups render as
//! zero/empty, and percentage math guards the zero-total case.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::types::{Expense, ExpenseCategory, ExpenseStatus, Sale, Vehicle, VehicleStatus};
use crate::{DASHBOARD_RECENT_SALES, DASHBOARD_TOP_SELLERS, REPORT_TOP_MODELS};

/// Grouping key used when a sale carries no usable vehicle name.
const FALLBACK_MODEL: &str = "Other";

/// Grouping key used when a sale carries no employee name.
const FALLBACK_EMPLOYEE: &str = "Unknown";

// =============================================================================
// Output Types
// =============================================================================

/// Per-employee sales statistics for the requested year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStat {
    pub name: String,
    pub count: u32,
    /// Sum of frozen per-sale profits; may be negative.
    pub profit: i64,
}

/// A model-name grouping with its sale count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCount {
    pub name: String,
    pub count: u32,
}

/// One category's share of the year's expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: ExpenseCategory,
    pub amount: i64,
    /// Percentage of the total filtered expenses; `0.0` when the total is
    /// zero (never a division by zero).
    pub percent: f64,
}

/// The yearly report consumed by the reports screen.
///
/// Monthly sequences always have length 12 regardless of input sparsity;
/// months with no records are zero, not omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearReport {
    pub year: i32,
    pub monthly_revenue: [i64; 12],
    pub monthly_profit: [i64; 12],
    pub monthly_expenses: [i64; 12],
    /// Sorted by sale count descending; ties keep discovery order.
    pub employee_stats: Vec<EmployeeStat>,
    /// Top 5 models by sale count descending.
    pub top_models: Vec<ModelCount>,
    /// Sorted by amount descending.
    pub category_expenses: Vec<CategoryShare>,
    pub total_revenue: i64,
    pub total_profit: i64,
    pub total_expenses: i64,
    pub total_sales: u32,
}

/// Which expenses count towards the dashboard's expense tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseScope {
    /// Every expense regardless of review state.
    All,
    /// Only expenses a reviewer has approved.
    ApprovedOnly,
}

/// A dashboard leaderboard entry (count only; profit is a report concern).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSeller {
    pub name: String,
    pub count: u32,
}

/// The current-month dashboard summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Sales committed in the current calendar month.
    pub monthly_sales: u32,
    /// Sum of frozen profits for the current month.
    pub net_profit: i64,
    /// Vehicles currently in `available` status.
    pub available_vehicles: u32,
    /// Expense sum for the current month, per the configured scope.
    pub monthly_expenses: i64,
    /// Sale counts per month of the current year (index 0 = January).
    pub monthly_sale_counts: [u32; 12],
    /// Top 3 employees by all-time sale count.
    pub top_sellers: Vec<TopSeller>,
    /// 8 most recent sales, commit timestamp descending; equal timestamps
    /// keep their original relative order.
    pub recent_sales: Vec<Sale>,
}

// =============================================================================
// Yearly Report
// =============================================================================

/// Folds the full Sale/Expense history into the report for one year.
///
/// Pure and deterministic: never mutates inputs, produces byte-identical
/// output for identical inputs.
pub fn yearly(sales: &[Sale], expenses: &[Expense], year: i32) -> YearReport {
    let mut monthly_revenue = [0i64; 12];
    let mut monthly_profit = [0i64; 12];
    let mut monthly_expenses = [0i64; 12];

    // Discovery-ordered accumulators. Linear lookup keeps ties in insertion
    // order, which the stable sort below preserves.
    let mut employee_stats: Vec<EmployeeStat> = Vec::new();
    let mut model_counts: Vec<ModelCount> = Vec::new();
    let mut total_sales = 0u32;

    for sale in sales {
        if sale.date.year() != year {
            continue;
        }
        let month = sale.date.month0() as usize;
        monthly_revenue[month] += sale.price;
        monthly_profit[month] += sale.profit;
        total_sales += 1;

        let employee = if sale.employee_name.trim().is_empty() {
            FALLBACK_EMPLOYEE
        } else {
            sale.employee_name.as_str()
        };
        match employee_stats.iter_mut().find(|e| e.name == employee) {
            Some(stat) => {
                stat.count += 1;
                stat.profit += sale.profit;
            }
            None => employee_stats.push(EmployeeStat {
                name: employee.to_string(),
                count: 1,
                profit: sale.profit,
            }),
        }

        let model = model_key(&sale.car_name);
        match model_counts.iter_mut().find(|m| m.name == model) {
            Some(entry) => entry.count += 1,
            None => model_counts.push(ModelCount {
                name: model,
                count: 1,
            }),
        }
    }

    let mut category_expenses: Vec<CategoryShare> = Vec::new();
    for expense in expenses {
        if expense.date.year() != year {
            continue;
        }
        let month = expense.date.month0() as usize;
        monthly_expenses[month] += expense.amount;

        match category_expenses
            .iter_mut()
            .find(|c| c.category == expense.category)
        {
            Some(share) => share.amount += expense.amount,
            None => category_expenses.push(CategoryShare {
                category: expense.category,
                amount: expense.amount,
                percent: 0.0,
            }),
        }
    }

    // Rankings: stable sorts keep discovery order for ties.
    employee_stats.sort_by(|a, b| b.count.cmp(&a.count));
    model_counts.sort_by(|a, b| b.count.cmp(&a.count));
    model_counts.truncate(REPORT_TOP_MODELS);
    category_expenses.sort_by(|a, b| b.amount.cmp(&a.amount));

    let total_expenses: i64 = monthly_expenses.iter().sum();
    for share in &mut category_expenses {
        share.percent = if total_expenses == 0 {
            0.0
        } else {
            share.amount as f64 * 100.0 / total_expenses as f64
        };
    }

    YearReport {
        year,
        total_revenue: monthly_revenue.iter().sum(),
        total_profit: monthly_profit.iter().sum(),
        total_expenses,
        total_sales,
        monthly_revenue,
        monthly_profit,
        monthly_expenses,
        employee_stats,
        top_models: model_counts,
        category_expenses,
    }
}

/// Normalized model grouping key: the first two whitespace-separated tokens
/// of the denormalized vehicle name.
fn model_key(car_name: &str) -> String {
    let tokens: Vec<&str> = car_name.split_whitespace().take(2).collect();
    if tokens.is_empty() {
        FALLBACK_MODEL.to_string()
    } else {
        tokens.join(" ")
    }
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// Produces the current-month dashboard view from full collection snapshots.
///
/// `now` is an explicit input so the transform stays pure and testable.
pub fn dashboard(
    vehicles: &[Vehicle],
    sales: &[Sale],
    expenses: &[Expense],
    now: DateTime<Utc>,
    scope: ExpenseScope,
) -> DashboardSummary {
    let current_year = now.year();
    let current_month = now.month0();

    let mut monthly_sales = 0u32;
    let mut net_profit = 0i64;
    let mut monthly_sale_counts = [0u32; 12];
    let mut top_sellers: Vec<TopSeller> = Vec::new();

    for sale in sales {
        if sale.date.year() == current_year {
            monthly_sale_counts[sale.date.month0() as usize] += 1;
            if sale.date.month0() == current_month {
                monthly_sales += 1;
                net_profit += sale.profit;
            }
        }

        // Leaderboard counts all-time sales, not just the current year.
        if !sale.employee_name.trim().is_empty() {
            match top_sellers
                .iter_mut()
                .find(|t| t.name == sale.employee_name)
            {
                Some(entry) => entry.count += 1,
                None => top_sellers.push(TopSeller {
                    name: sale.employee_name.clone(),
                    count: 1,
                }),
            }
        }
    }

    top_sellers.sort_by(|a, b| b.count.cmp(&a.count));
    top_sellers.truncate(DASHBOARD_TOP_SELLERS);

    let available_vehicles = vehicles
        .iter()
        .filter(|v| v.status == VehicleStatus::Available)
        .count() as u32;

    let monthly_expenses = expenses
        .iter()
        .filter(|e| e.date.year() == current_year && e.date.month0() == current_month)
        .filter(|e| match scope {
            ExpenseScope::All => true,
            ExpenseScope::ApprovedOnly => e.status == ExpenseStatus::Approved,
        })
        .map(|e| e.amount)
        .sum();

    let mut recent_sales: Vec<Sale> = sales.to_vec();
    recent_sales.sort_by(|a, b| b.date.cmp(&a.date));
    recent_sales.truncate(DASHBOARD_RECENT_SALES);

    DashboardSummary {
        monthly_sales,
        net_profit,
        available_vehicles,
        monthly_expenses,
        monthly_sale_counts,
        top_sellers,
        recent_sales,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
