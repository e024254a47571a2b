pub mod p100_ambit_wip;
