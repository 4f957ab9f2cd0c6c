pub mod yfinance;
