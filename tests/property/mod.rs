mod batch_order;
